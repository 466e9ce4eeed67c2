fn main() {
    // Windows only: version info and optional icon
    #[cfg(windows)]
    {
        let mut res = winres::WindowsResource::new();

        if std::path::Path::new("../app-icon.ico").exists() {
            res.set_icon("../app-icon.ico");
        }

        let version = env!("CARGO_PKG_VERSION");
        let major: Vec<&str> = version.split('.').collect();
        let version_string = format!(
            "{}.{}.{}.0",
            major.first().unwrap_or(&"1"),
            major.get(1).unwrap_or(&"0"),
            major.get(2).unwrap_or(&"0")
        );

        res.set("ProductName", "Hours Signer")
            .set("FileDescription", "Sign timesheet PDFs from the terminal")
            .set("LegalCopyright", "Licensed under Apache-2.0")
            .set("FileVersion", &version_string)
            .set("ProductVersion", version);

        if let Err(e) = res.compile() {
            eprintln!("Warning: Failed to compile Windows resources: {}", e);
        }
    }

    println!("cargo:rerun-if-changed=../app-icon.ico");
}
