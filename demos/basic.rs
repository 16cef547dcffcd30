//! Basic example walking the animals of a zoo.
//!
//! Run with: RTTI_LIBRARY=/path/to/librtti.so cargo run --example basic

use rtti::{AnimalClass, BaseClass, ConcreteAnimal, Rtti};

fn main() -> rtti::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Load the library and check its binary version
    let rtti = Rtti::from_env()?;
    println!("Library version: {}", rtti.get_version()?);
    println!("Bindings version: {}", rtti::version::BINDING);

    println!("\n--- Creating Zoo ---");
    let zoo = rtti.create_zoo()?;
    println!("Zoo class type id: {:#018x}", zoo.class_type_id()?);

    println!("\n--- Animals ---");
    for animal in zoo.animals()? {
        let animal = animal?;
        println!("{:<10} {}", animal.name()?, animal.runtime_class());

        match animal.concrete()? {
            ConcreteAnimal::Tiger(tiger) => {
                if let Err(e) = tiger.roar() {
                    println!("  could not roar: {}", e);
                }
            }
            ConcreteAnimal::Snake(_) | ConcreteAnimal::Turtle(_) => println!("  (reptile)"),
            ConcreteAnimal::Giraffe(_) => println!("  (mammal)"),
        }
    }

    println!("\nLive objects: {}", rtti.live_objects());
    Ok(())
}
