fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=src/network/messages/ring.proto");
    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(
            &["src/network/messages/ring.proto"],
            &["src/network/messages/"],
        )?;
    Ok(())
}
