//! `vitae tools` — Show the tool descriptors sent with every LLM call.

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let definitions = vitae_tools::definitions();

    if json {
        println!("{}", serde_json::to_string_pretty(&definitions)?);
        return Ok(());
    }

    for def in &definitions {
        let required: Vec<&str> = def.parameters["required"]
            .as_array()
            .map(|fields| fields.iter().filter_map(|f| f.as_str()).collect())
            .unwrap_or_default();
        let optional: Vec<&str> = def.parameters["properties"]
            .as_object()
            .map(|props| {
                props
                    .keys()
                    .map(String::as_str)
                    .filter(|k| !required.contains(k))
                    .collect()
            })
            .unwrap_or_default();

        println!("🔧 {}", def.name);
        println!("   {}", def.description);
        println!("   required: {}", required.join(", "));
        if !optional.is_empty() {
            println!("   optional: {}", optional.join(", "));
        }
        println!();
    }

    Ok(())
}
