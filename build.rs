fn main() {
    // The radiative-transfer kernel is an external native library, linked
    // only when the transit-kernel feature is enabled.
    if std::env::var_os("CARGO_FEATURE_TRANSIT_KERNEL").is_some() {
        match pkg_config::Config::new().probe("exotransmit") {
            Ok(lib) => {
                for path in lib.link_paths {
                    println!("cargo:rustc-link-search={}", path.display());
                }
            }
            Err(_) => {
                // Fallback to common install prefixes
                println!("cargo:rustc-link-search=/usr/local/lib");
                println!("cargo:rustc-link-search=/opt/homebrew/lib");
                println!("cargo:rustc-link-lib=exotransmit");
            }
        }
    }
}
