//! The `examtool init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create examtool.toml
    if std::path::Path::new("examtool.toml").exists() {
        println!("examtool.toml already exists, skipping.");
    } else {
        std::fs::write("examtool.toml", SAMPLE_CONFIG)?;
        println!("Created examtool.toml");
    }

    // Create example exam
    let example_path = std::path::Path::new("exam.typ");
    if example_path.exists() {
        println!("exam.typ already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_EXAM)?;
        println!("Created exam.typ");
    }

    println!("\nNext steps:");
    println!("  1. Copy your EXAM session cookies into EXAM_COOKIE");
    println!("  2. Run: examtool validate exam.typ");
    println!("  3. Run: examtool import <exam_id> <owner_id> exam.typ");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# examtool configuration

base_url = "https://exam.aalto.fi"
cookie = "${EXAM_COOKIE}"
timeout_secs = 60
default_max_score = 1

# Route traffic through an intercepting proxy:
# proxy = "https://localhost:8080"
# accept_invalid_certs = true
"#;

const EXAMPLE_EXAM: &str = r#"= Ownership (lottery 1)
Answer one randomly picked question.
== Moves
What happens to `s` after `let t = s;` when `s` is a `String`?
+ It is moved into `t` (correct)
+ It is copied into `t`
+ It is dropped immediately
== Borrows
How many mutable references to a value may exist at once?
+ One (correct)
+ Two
+ Unlimited

= Syntax
== Blocks
What does this print?

```rust
let x = { 1 + 1 };
println!("{x}");
```
+ 2 (correct)
+ 11
"#;
