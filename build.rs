use shadow_rs::ShadowBuilder;

fn main() {
    // Build metadata backs `--version` and the `/up` endpoint
    ShadowBuilder::builder()
        .build()
        .expect("Failed to generate build metadata");
}
