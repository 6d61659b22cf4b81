use std::collections::HashMap;
use threshold_eval::{Evaluator, Value};

fn main() {
    pretty_env_logger::init();

    let contexts = vec![
        HashMap::from([
            ("price".to_string(), Value::Number(120.0)),
            ("volume".to_string(), Value::Number(3000.0)),
        ]),
        HashMap::from([
            ("price".to_string(), Value::Number(80.0)),
            ("volume".to_string(), Value::Number(6000.0)),
        ]),
        HashMap::from([("price".to_string(), Value::Number(150.0))]),
    ];

    let expression = "price > 100 && volume < 5000";
    let evaluator = Evaluator::new(expression).unwrap();

    for (i, result) in evaluator.eval_batch(&contexts).iter().enumerate() {
        println!("Result {}: {:?}", i, result);
    }
}
