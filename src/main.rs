// This binary crate is intentionally minimal.
// All neural network logic lives in the library (src/lib.rs and its modules).
// Run examples with:
//   cargo run --example xor
fn main() {
    println!("hematite-nn: a minimal single-hidden-layer neural network library in Rust.");
    println!("Run `cargo run --example xor` to see the XOR demo.");
}
