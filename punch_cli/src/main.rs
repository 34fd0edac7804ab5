//! # Punching-Shear Verification Console
//!
//! Interactive console front-end for `punch_core`. Prompts for the slab,
//! materials, column and action data, validates each entry against its
//! bounds, converts user units (kN, kN·m, kPa) to the engine's internal
//! units (N, N·m, Pa), runs the verification and prints the report.
//!
//! All domain logic lives in `punch_core`; this binary only collects and
//! converts input.

use std::io::{self, BufRead, Write};

use punch_core::beta::BetaMethod;
use punch_core::calculations::punching::{calculate, PunchingInput};
use punch_core::calculations::CalculationItem;
use punch_core::geometry::{ColumnGeometry, ColumnPosition};
use punch_core::materials::{Concrete, ReinforcingSteel};
use punch_core::project::Project;
use punch_core::units::{KiloNewtonMeters, KiloNewtons, KiloPascals, NewtonMeters, Newtons, Pascals};

/// Prompt for a float, re-prompting until the value parses and lies in
/// [min, max]. An empty entry returns `default` when one is given.
fn prompt_f64(prompt: &str, min: f64, max: f64, default: Option<f64>) -> f64 {
    loop {
        print!("{}", prompt);
        if io::stdout().flush().is_err() {
            if let Some(d) = default {
                return d;
            }
            continue;
        }

        let mut input = String::new();
        if io::stdin().lock().read_line(&mut input).is_err() {
            if let Some(d) = default {
                return d;
            }
            continue;
        }

        let trimmed = input.trim();
        if trimmed.is_empty() {
            if let Some(d) = default {
                return d;
            }
            println!("A value is required.");
            continue;
        }

        match trimmed.parse::<f64>() {
            Ok(value) if value < min => {
                println!("Invalid value. Must be >= {min:.3}. Try again.");
            }
            Ok(value) if value > max => {
                println!("Invalid value. Must be <= {max:.3}. Try again.");
            }
            Ok(value) => return value,
            Err(_) => println!("Invalid entry. Please type a number."),
        }
    }
}

/// Prompt for one of a fixed set of options (case-insensitive).
fn prompt_choice(prompt: &str, options: &[&str]) -> String {
    loop {
        print!("{}", prompt);
        if io::stdout().flush().is_err() {
            continue;
        }

        let mut input = String::new();
        if io::stdin().lock().read_line(&mut input).is_err() {
            continue;
        }

        let value = input.trim().to_lowercase();
        if options.iter().any(|opt| opt.eq_ignore_ascii_case(&value)) {
            return value;
        }
        println!("Invalid option. Choose one of: {}", options.join(", "));
    }
}

/// Prompt for a yes/no answer.
fn prompt_yes_no(prompt: &str) -> bool {
    prompt_choice(&format!("{prompt} (y/n): "), &["y", "n"]) == "y"
}

fn main() {
    env_logger::init();

    println!("==============================================================");
    println!(" Punching-Shear Verification - EN 1992-1-1");
    println!("==============================================================");
    println!("Please enter the project data.");

    // 1. Materials
    println!("\n--- 1. Materials ---");
    let fck = prompt_f64("Concrete strength fck (MPa) [e.g. 30]: ", 12.0, 90.0, None);
    let fyk = prompt_f64("Steel yield strength fyk (MPa) [e.g. 500]: ", 400.0, 600.0, None);
    let fywk = fyk;

    // 2. Slab
    println!("\n--- 2. Slab ---");
    let d_m = prompt_f64(
        "Effective slab depth d (m) [e.g. 0.22]: ",
        0.01,
        f64::INFINITY,
        None,
    );
    let as_lx = prompt_f64("Reinforcement As,lx (cm²/m): ", 0.0, f64::INFINITY, None);
    let as_ly = prompt_f64("Reinforcement As,ly (cm²/m): ", 0.0, f64::INFINITY, None);
    let sigma_cp = prompt_f64(
        "\nMean in-plane compressive stress sigma_cp (MPa) [default 0]: ",
        0.0,
        f64::INFINITY,
        Some(0.0),
    );

    // 3. Column
    println!("\n--- 3. Column ---");
    let position = match prompt_choice(
        "Column position (interior, edge, corner): ",
        &["interior", "edge", "corner"],
    )
    .as_str()
    {
        "interior" => ColumnPosition::Interior,
        "edge" => ColumnPosition::Edge,
        _ => ColumnPosition::Corner,
    };
    let shape = prompt_choice(
        "Column shape (rectangular, circular): ",
        &["rectangular", "circular"],
    );

    let geometry = if shape == "rectangular" {
        let (c1_hint, c2_hint) = match position {
            ColumnPosition::Interior => ("", ""),
            ColumnPosition::Edge => (" [parallel to the edge]", " [perpendicular to the edge]"),
            ColumnPosition::Corner => (" [parallel to x]", " [parallel to y]"),
        };
        let c1 = prompt_f64(
            &format!("Column side c1 (m){c1_hint}: "),
            0.01,
            f64::INFINITY,
            None,
        );
        let c2 = prompt_f64(
            &format!("Column side c2 (m){c2_hint}: "),
            0.01,
            f64::INFINITY,
            None,
        );
        ColumnGeometry::Rectangular { c1_m: c1, c2_m: c2 }
    } else {
        let diameter = prompt_f64(
            "Column diameter (m) [e.g. 0.35]: ",
            0.01,
            f64::INFINITY,
            None,
        );
        ColumnGeometry::Circular {
            diameter_m: diameter,
        }
    };

    // 4. Actions (ULS)
    println!("\n--- 4. Actions (ULS) ---");
    let v_ed_kn = prompt_f64(
        "Design shear force V_Ed (kN) [e.g. 600]: ",
        0.0,
        f64::INFINITY,
        None,
    );
    let m_edx_knm = prompt_f64(
        "Design moment M_Edx (kN·m) [about x, default 0]: ",
        f64::NEG_INFINITY,
        f64::INFINITY,
        Some(0.0),
    );
    let m_edy_knm = prompt_f64(
        "Design moment M_Edy (kN·m) [about y, default 0]: ",
        f64::NEG_INFINITY,
        f64::INFINITY,
        Some(0.0),
    );

    // 5. Additional parameters
    println!("\n--- 5. Additional parameters ---");
    let is_footing = prompt_yes_no("Is the element a foundation slab (footing)?");
    let soil_pressure_kpa = if is_footing {
        prompt_f64(
            "\nDesign soil pressure sigma_gd (kPa) [e.g. 150]: ",
            0.0,
            f64::INFINITY,
            None,
        )
    } else {
        0.0
    };

    let u1_ineffective_m = if prompt_yes_no(&format!(
        "\nAre there openings within 6*d ({:.3} m) of the column face?",
        6.0 * d_m
    )) {
        prompt_f64(
            "Ineffective length to subtract from u1 (m): ",
            0.0,
            f64::INFINITY,
            None,
        )
    } else {
        0.0
    };

    // 6. Beta mode
    println!("\n--- 6. Beta options ---");
    let beta_method = match prompt_choice(
        "Beta mode (simplified, computed): ",
        &["simplified", "computed"],
    )
    .as_str()
    {
        "computed" => BetaMethod::Computed,
        _ => BetaMethod::Simplified,
    };

    // Convert user units to the engine's internal N / N·m / Pa
    let v_ed: Newtons = KiloNewtons(v_ed_kn).into();
    let m_edx: NewtonMeters = KiloNewtonMeters(m_edx_knm).into();
    let m_edy: NewtonMeters = KiloNewtonMeters(m_edy_knm).into();
    let soil_pressure: Pascals = KiloPascals(soil_pressure_kpa).into();

    let input = PunchingInput {
        label: "Console check".to_string(),
        d_m,
        as_lx_cm2pm: Some(as_lx),
        as_ly_cm2pm: Some(as_ly),
        rho_l: None,
        concrete: Concrete::new(fck),
        flexural_steel: ReinforcingSteel::new(fyk),
        shear_steel: ReinforcingSteel::new(fywk),
        geometry,
        position,
        v_ed_n: v_ed.value(),
        m_edx_nm: m_edx.value(),
        m_edy_nm: m_edy.value(),
        sigma_cp_mpa: sigma_cp,
        is_footing,
        soil_pressure_pa: soil_pressure.value(),
        u1_ineffective_m,
        beta_method,
    };

    let mut project = Project::new("Console user", "-", "-");
    project.add_item(CalculationItem::Punching(input.clone()));
    log::info!(
        "running punching verification ({} column, {})",
        input.geometry.shape_name(),
        input.position
    );

    println!("\n{}", "=".repeat(62));
    println!(" RUNNING VERIFICATION...");
    println!("{}", "=".repeat(62));

    match calculate(&input) {
        Ok(result) => {
            println!("{}", result.report_text());
            println!("{}", "=".repeat(62));
            println!(" RESULT: {}", result.outcome.display_name().to_uppercase());
            println!("{}", "=".repeat(62));

            println!();
            println!("Result JSON (for programmatic use):");
            if let Ok(json) = serde_json::to_string_pretty(&result) {
                println!("{}", json);
            }

            println!();
            println!("Project JSON (inputs):");
            if let Ok(json) = serde_json::to_string_pretty(&project) {
                println!("{}", json);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
        }
    }
}
