//! CLI demo for the NARS kernel.

use narsese_kernel::config::NarConfig;
use narsese_kernel::nar::Nar;

fn main() {
    env_logger::init();

    println!("narsese-kernel — Non-Axiomatic Reasoning System");
    println!("================================================");

    let mut nar = Nar::new(NarConfig::default());

    println!("\nInputting initial knowledge...");
    nar.input("<cat --> animal>. %1.0;0.9%").expect("failed to parse sentence");
    nar.input("<dog --> animal>. %1.0;0.9%").expect("failed to parse sentence");
    nar.input("<cat --> furry>. %1.0;0.9%").expect("failed to parse sentence");

    let stats = nar.stats();
    println!("\nInitial state:");
    println!("  Cycles: {}", stats.cycles);
    println!("  Concepts: {}", stats.concepts);

    println!("\nRunning reasoning cycles...");
    nar.run(50);

    let stats = nar.stats();
    println!("\nFinal state:");
    println!("  Cycles: {}", stats.cycles);
    println!("  Concepts: {}", stats.concepts);

    println!("\nAnswering <cat --> ?what>?");
    match nar.query("<cat --> ?what>?") {
        Ok(answers) => {
            for answer in answers {
                println!("  {} {}", answer.term, answer.truth);
            }
        }
        Err(e) => println!("  query failed: {e}"),
    }

    println!("\nnarsese-kernel run complete.");
}
