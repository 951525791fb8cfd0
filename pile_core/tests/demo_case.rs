//! End-to-end analysis of the built-in demonstration case.

use approx::assert_abs_diff_eq;
use pile_core::calculations::{EquilibriumStatus, PileEquilibriumEngine};
use pile_core::{analyze, load_case, save_case, PileCase};

#[test]
fn demo_case_full_analysis() {
    let case = PileCase::demo();
    let report = analyze(&case).unwrap();

    assert_eq!(report.case_name, "NDC_Pieu");
    assert_eq!(report.slice_count, 200);
    assert!(report.continuous_stratigraphy);

    // p_le* taken entirely in the lower marl, full embedment
    assert_abs_diff_eq!(report.resistances.equivalent_limit_pressure, 5.0, epsilon = 1e-9);
    assert_abs_diff_eq!(report.resistances.effective_embedment, 5.6, epsilon = 1e-9);
    assert_eq!(report.resistances.bearing_factor, report.resistances.kp_max);

    let eq = &report.equilibrium;
    assert_eq!(eq.status, EquilibriumStatus::Converged);
    assert_eq!(eq.head_load, 1.5);
    assert!(eq.head_displacement > eq.base_displacement);
    assert!(eq.base_displacement > 0.0);
    assert!(eq.tip_reaction > 0.0);
    assert!(eq.residual.abs() <= 1.5e-5);
    assert_eq!(eq.slices.len(), 200);
    assert!(eq.max_friction_mobilization() <= 1.0 + 1e-12);

    let curve = &report.settlement;
    assert_eq!(curve.len() + curve.skipped_loads.len(), 21);
    for pair in curve.points.windows(2) {
        assert!(pair[1].head_displacement >= pair[0].head_displacement);
    }

    let c = &report.capacities;
    assert!(c.compression.sls_quasi_permanent < c.compression.sls_characteristic);
    assert!(c.compression.uls_fundamental < c.compression.uls_accidental);
    assert!(c.tension.uls_fundamental < 0.0);

    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"status\":\"Converged\""));
    assert!(json.contains("\"slices_converged\":true"));
}

#[test]
fn saved_case_reloads_and_solves() {
    let path = std::env::temp_dir().join("pile_core_integration_demo.pile");
    let mut case = PileCase::demo();
    case.settings.target_head_load = 0.8;
    save_case(&case, &path).unwrap();

    let loaded = load_case(&path).unwrap();
    assert_eq!(loaded.meta.id, case.meta.id);
    assert_eq!(loaded.settings.target_head_load, 0.8);

    let engine = PileEquilibriumEngine::new(&loaded.pile).unwrap();
    let uplift = engine.solve_head_load(-0.8, &loaded.settings.equilibrium).unwrap();
    assert_eq!(uplift.tip_reaction, 0.0);
    assert!(uplift.head_displacement < 0.0);

    let _ = std::fs::remove_file(&path);
}
