use log::debug;
use std::collections::HashMap;
use threshold_eval::{Evaluator, Value};

fn main() {
    pretty_env_logger::init();

    let variables = HashMap::from([
        ("var1".to_string(), Value::from("hoge")),
        ("var2".to_string(), Value::from(3)),
    ]);

    let expressions = [
        "(5.5 + 4.5) * var2",
        "coalesce(as_numeric(var1), 10.0)",
        r#"if(regexp_match(as_string(var1), "^hoge"), 1.8, 3.14)"#,
        "var2 / 0",
    ];

    for expression in expressions {
        let evaluator = match Evaluator::new(expression) {
            Ok(evaluator) => evaluator,
            Err(err) => {
                println!("{expression}: {err}");
                continue;
            }
        };
        debug!("ast: {:?}", evaluator.ast());

        match evaluator.eval(&variables) {
            Ok(result) => println!("{evaluator} => {result}"),
            Err(err) => println!("{evaluator} => error: {err}"),
        }
    }
}
