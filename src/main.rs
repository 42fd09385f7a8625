fn main() {
    #[cfg(feature = "cli")]
    gbpatch::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("gbpatch: CLI not enabled. Rebuild with `--features cli`.");
        std::process::exit(1);
    }
}
