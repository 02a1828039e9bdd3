use brawl_ffi::{simulate_duel_json, simulate_duel_many_json, simulate_royale_json, VERSION};

fn main() {
    println!("FFI Version: {}", VERSION);

    let duel = r#"{"challenger":"alice","opponent":"bob","seed":2025}"#;
    println!("simulate_duel_json = {}", simulate_duel_json(duel));

    let house = r#"{"challenger":"bot","opponent":"alice","house":"bot"}"#;
    println!("house duel = {}", simulate_duel_json(house));

    let many = r#"{"challenger":"alice","opponent":"bob","seed":1,"samples":200}"#;
    println!("simulate_duel_many_json = {}", simulate_duel_many_json(many));

    let royale = r#"{"players":["a","b","c","d"],"seed":7}"#;
    println!("simulate_royale_json = {}", simulate_royale_json(royale));

    // Determinism check
    println!("Determinism check:");
    println!("  equal: {}", simulate_duel_json(duel) == simulate_duel_json(duel));
    println!("Error envelope: {}", simulate_duel_json("{}"));
}
