#![no_main]
use growth_scenario_explorer::analysis::evaluate_all;
use growth_scenario_explorer::io::read_scenarios_csv_from_bytes;
use growth_scenario_explorer::TimeSequence;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(table) = read_scenarios_csv_from_bytes(data) {
        if let Ok(t) = TimeSequence::generate(50.0, 64) {
            let eval = evaluate_all(table.rows(), &t);
            assert!(eval.num_valid() <= table.len());
            for curve in eval.curves.values() {
                assert_eq!(curve.len(), t.len());
            }
        }
    }
});
