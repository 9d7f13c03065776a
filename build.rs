fn main() -> Result<(), Box<dyn std::error::Error>> {
    cfg_rust_features::emit!(["unstable_features"]).map(|_| ())
}
