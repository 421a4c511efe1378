//! Pizza Webhook - a single request through the assistant.
//!
//! This example demonstrates:
//! - Building an assistant with the builder pattern
//! - Reading number and globbed parameters in a handler
//! - Answering with speech, suggestion chips and an output context
//!
//! Reads a Google Assistant webhook payload from stdin (a sample order is used
//! when stdin is empty) and prints the status code and the response body.
//!
//! ```text
//! echo '{"result": {"action": "order.pizza", "parameters": {"count": "two"}},
//!        "originalRequest": {"data": {}}}' | cargo run --example pizza
//! ```

use std::io::Read;

use assistant_webhook::{Agent, Assistant, GetOptions, Param};
use serde_json::{json, Map, Value};

fn sample_request() -> Value {
    json!({
        "result": {
            "action": "order.pizza",
            "parameters": {
                "count": "three",
                "topping": "ham",
                "topping2": "mushrooms"
            },
            "contexts": []
        },
        "originalRequest": {"source": "google", "data": {}}
    })
}

fn order_pizza(agent: &mut Agent) -> assistant_webhook::HandlerResult {
    let count = agent
        .get("count", GetOptions::new().number())?
        .and_then(|p| p.as_number())
        .unwrap_or(1);
    let toppings = agent
        .get("topping", GetOptions::new().globbing(true))?
        .as_ref()
        .and_then(Param::as_text_list)
        .map(|t| t.join(" and "))
        .unwrap_or_else(|| "cheese".to_string());

    agent.ask_raw(
        &format!("{} pizzas with {}. Anything to drink?", count, toppings),
        None,
    )?;
    agent.suggest(["Cola", "Water", "No thanks"])?;
    agent.add_context("order", 2, Map::new());
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let assistant = Assistant::builder()
        .intent("order.pizza", order_pizza)
        .build();

    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    let payload = if input.trim().is_empty() {
        sample_request()
    } else {
        serde_json::from_str(&input)?
    };

    match assistant.process(&payload, None) {
        Ok(agent) => {
            let code = agent.status().map(|s| s.http_code()).unwrap_or(500);
            println!("{}", code);
            println!("{}", agent.response().to_json_string()?);
        }
        Err(e) => {
            println!("{}", e.status().http_code());
            eprintln!("{}", e);
        }
    }

    Ok(())
}
