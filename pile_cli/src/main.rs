//! # Pile CLI
//!
//! Runs a load-transfer analysis and prints a text report.
//!
//! ```text
//! pile_cli [CASE_FILE] [--save OUT_FILE] [--json]
//! ```
//!
//! Without a case file the built-in demonstration case is used and the
//! target head load is asked on stdin. Set `RUST_LOG=debug` for solver traces.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use log::info;
use pile_core::calculations::{BearingCapacities, CaseReport, EquilibriumResult, SettlementCurve};
use pile_core::units::{KiloNewtons, MegaNewtons, Meters, Millimeters};
use pile_core::{analyze, load_case, save_case, CalcError, PileCase, PileGeometry};

struct Args {
    case_file: Option<PathBuf>,
    save_to: Option<PathBuf>,
    json: bool,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        case_file: None,
        save_to: None,
        json: false,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--save" => {
                let out = iter.next().ok_or("--save needs a file name")?;
                args.save_to = Some(PathBuf::from(out));
            }
            "--json" => args.json = true,
            "-h" | "--help" => return Err(String::new()),
            other if other.starts_with('-') => return Err(format!("unknown option '{}'", other)),
            other => args.case_file = Some(PathBuf::from(other)),
        }
    }
    Ok(args)
}

fn prompt_f64(prompt: &str, default: f64) -> f64 {
    print!("{}", prompt);
    if io::stdout().flush().is_err() {
        return default;
    }

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return default;
    }

    input.trim().parse().unwrap_or(default)
}

fn kn(mn: f64) -> f64 {
    KiloNewtons::from(MegaNewtons(mn)).0
}

fn mm(m: f64) -> f64 {
    Millimeters::from(Meters(m)).0
}

fn banner(title: &str) {
    println!("═══════════════════════════════════════");
    println!("  {}", title);
    println!("═══════════════════════════════════════");
}

fn print_description(pile: &PileGeometry) {
    let section = pile.section();
    println!("Pile:");
    println!("  Type:        {}", pile.category.description());
    println!("  Abbreviation: {}", pile.category.abbreviation());
    println!("  Category:    {} (NF P94-262 Table A.1)", pile.category.code());
    println!("  Class:       {}", pile.category.class());
    println!();
    println!("Geometry:");
    println!("  Head level:  z = {:.3} m", pile.top_level);
    println!("  Tip level:   z = {:.3} m", pile.bottom_level);
    println!("  Section:     A = {:.5} m²", section.area());
    println!("  Perimeter:   P = {:.4} m", section.perimeter());
    println!("  Height:      H = {:.3} m", pile.height());
    println!("  Modulus:     E = {:.0} MPa", pile.young_modulus);
    println!();
    println!("Soil layers:");
    for layer in &pile.layers {
        println!(
            "  {:<16} {:>8.2} → {:>8.2} m  {}  p_l = {:.2} MPa  E_M = {:.1} MPa  ({})",
            layer.name,
            layer.top_level,
            layer.bottom_level,
            layer.friction_curve,
            layer.limit_pressure,
            layer.pressuremeter_modulus,
            layer.soil_class
        );
    }
}

fn print_capacities(c: &BearingCapacities) {
    println!("Resistances:");
    println!("  R_b+s    = {:>9.1} kN  total", kn(c.total_resistance));
    println!("  R_b      = {:>9.1} kN  base", kn(c.base_resistance));
    println!("  R_s      = {:>9.1} kN  shaft", kn(c.shaft_resistance));
    println!("  R_b;k    = {:>9.1} kN  characteristic base", kn(c.characteristic_base));
    println!("  R_s;k,c  = {:>9.1} kN  characteristic shaft (compression)", kn(c.characteristic_shaft));
    println!("  R_s;k,t  = {:>9.1} kN  characteristic shaft (tension)", kn(c.characteristic_shaft_tension));
    println!();
    println!("Compression capacity:");
    println!("  SLS QP   ≤ {:>9.1} kN", kn(c.compression.sls_quasi_permanent));
    println!("  SLS CHAR ≤ {:>9.1} kN", kn(c.compression.sls_characteristic));
    println!("  ULS STR  ≤ {:>9.1} kN", kn(c.compression.uls_fundamental));
    println!("  ULS ACC  ≤ {:>9.1} kN", kn(c.compression.uls_accidental));
    println!();
    println!("Tension capacity:");
    println!("  SLS QP   ≥ {:>9.1} kN", kn(c.tension.sls_quasi_permanent));
    println!("  SLS CHAR ≥ {:>9.1} kN", kn(c.tension.sls_characteristic));
    println!("  ULS STR  ≥ {:>9.1} kN", kn(c.tension.uls_fundamental));
    println!("  ULS ACC  ≥ {:>9.1} kN", kn(c.tension.uls_accidental));
}

fn print_equilibrium(eq: &EquilibriumResult) {
    println!("Head load:         Q = {:.1} kN", kn(eq.head_load));
    println!("Head settlement:   w = {:.3} mm", mm(eq.head_displacement));
    println!("Tip settlement:    w = {:.3} mm", mm(eq.base_displacement));
    println!("Tip reaction:      R = {:.1} kN", kn(eq.tip_reaction));
    println!("Shaft load:        F = {:.1} kN", kn(eq.shaft_load()));
    println!("Status:            {:?} (residual {:.2e} MN)", eq.status, eq.residual);
    if !eq.slices_converged {
        println!("  [WARN] {} slice(s) used w_m = 0 after a failed midpoint solve", eq.failed_slices());
    }
    println!("Converged:         {}", if eq.converged() { "yes" } else { "no" });
    println!();
    println!("  {:>8}  {:>10}  {:>9}  {:>9}", "z (m)", "Q (kN)", "w (mm)", "τ/q_s");

    let step = (eq.slices.len() / 10).max(1);
    for (i, s) in eq.slices.iter().enumerate() {
        if i % step != 0 && i + 1 != eq.slices.len() {
            continue;
        }
        let ratio = if s.friction_limit > 0.0 { s.friction / s.friction_limit } else { 0.0 };
        println!(
            "  {:>8.2}  {:>10.1}  {:>9.3}  {:>9.2}",
            s.top_level,
            kn(s.force_top),
            mm(s.displacement_top),
            ratio
        );
    }
    if let Some(last) = eq.slices.last() {
        println!(
            "  {:>8.2}  {:>10.1}  {:>9.3}",
            last.bottom_level,
            kn(last.force_bottom),
            mm(last.displacement_bottom)
        );
    }
}

fn print_settlement(curve: &SettlementCurve) {
    println!("  {:>10}  {:>10}", "Q (kN)", "w (mm)");
    for p in &curve.points {
        println!(
            "  {:>10.1}  {:>10.3}{}",
            kn(p.head_load),
            mm(p.head_displacement),
            if p.converged { "" } else { "  (not converged)" }
        );
    }
    for q in &curve.skipped_loads {
        println!("  {:>10.1}  {:>10}", kn(*q), "skipped");
    }
}

fn print_report(case: &PileCase, report: &CaseReport) {
    banner(&format!("PILE ANALYSIS - {}", report.case_name));
    println!();
    print_description(&case.pile);
    if !report.continuous_stratigraphy {
        println!();
        println!("  [WARN] soil layers are not contiguous");
    }
    println!();
    banner("BEARING CAPACITY");
    println!();
    print_capacities(&report.capacities);
    println!();
    banner("EQUILIBRIUM UNDER TARGET LOAD");
    println!();
    print_equilibrium(&report.equilibrium);
    println!();
    banner("SETTLEMENT CURVE");
    println!();
    print_settlement(&report.settlement);
    println!();
}

fn run(args: &Args) -> Result<(), CalcError> {
    let mut case = match &args.case_file {
        Some(path) => load_case(path)?,
        None => {
            println!("Pile CLI - Axial load transfer (NF P94-262)");
            println!("===========================================");
            println!();
            println!("No case file given, using the demonstration case.");
            let mut case = PileCase::demo();
            let default_kn = kn(case.settings.target_head_load);
            let target_kn = prompt_f64(&format!("Enter target head load (kN) [{:.0}]: ", default_kn), default_kn);
            case.settings.target_head_load = MegaNewtons::from(KiloNewtons(target_kn)).0;
            println!();
            case
        }
    };

    info!("analyzing case '{}'", case.meta.name);
    let report = analyze(&case)?;
    print_report(&case, &report);

    if args.json {
        println!("JSON Output:");
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    if let Some(out) = &args.save_to {
        case.touch();
        save_case(&case, out)?;
        println!("Case saved to {}", out.display());
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(message) if message.is_empty() => {
            println!("Usage: pile_cli [CASE_FILE] [--save OUT_FILE] [--json]");
            return ExitCode::SUCCESS;
        }
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!("Usage: pile_cli [CASE_FILE] [--save OUT_FILE] [--json]");
            return ExitCode::FAILURE;
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            ExitCode::FAILURE
        }
    }
}
