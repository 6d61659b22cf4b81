use std::collections::HashMap;
use threshold_eval::{Evaluator, Value};

fn main() {
    pretty_env_logger::init();

    let mut evaluator = Evaluator::new("1.0 <= cpu_load <= 5 && !maintenance").unwrap();
    evaluator.set_strict(true);
    println!("rule: {evaluator}");

    let Some(comparator) = evaluator.as_comparator() else {
        println!("not a predicate");
        return;
    };

    let readings = [
        (2.0, false),
        (7.5, false),
        (3.0, true),
    ];
    for (load, maintenance) in readings {
        let variables = HashMap::from([
            ("cpu_load".to_string(), Value::from(load)),
            ("maintenance".to_string(), Value::from(maintenance)),
        ]);
        match comparator.compare(&variables) {
            Ok(fire) => println!("cpu_load={load} maintenance={maintenance} => alert: {fire}"),
            Err(err) => println!("cpu_load={load} => error: {err}"),
        }
    }

    let missing = HashMap::from([("cpu_load".to_string(), Value::from(2.0))]);
    if let Err(err) = comparator.compare(&missing) {
        println!("missing variable => {err} (not found: {})", err.is_variable_not_found());
    }
}
