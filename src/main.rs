fn main() {
    #[cfg(feature = "cli")]
    chunkpress::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("chunkpress: CLI not enabled. Rebuild with `--features cli`.");
        std::process::exit(1);
    }
}
