fn main() {
    // Writes OUT_DIR/built.rs, including GIT_COMMIT_HASH when built from a checkout.
    built::write_built_file().expect("Failed to acquire build-time information");
}
