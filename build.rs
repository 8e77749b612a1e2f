use std::env;
use std::fs;
use std::path::Path;

fn main() {
    println!("cargo:rerun-if-changed=templates/");

    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("embedded_templates.rs");

    // Get the manifest directory (where Cargo.toml is)
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let templates_dir = Path::new(&manifest_dir).join("templates");

    let mut template_files: Vec<(String, String)> = Vec::new();

    if templates_dir.exists() {
        template_files = fs::read_dir(&templates_dir)
            .unwrap()
            .filter_map(|entry| {
                let entry = entry.ok()?;
                let path = entry.path();
                let file_name = path.file_name()?.to_str()?.to_string();

                if !file_name.ends_with(".html") {
                    return None;
                }

                // Use absolute path for include_str!
                let absolute_path = path.canonicalize().ok()?;
                println!("cargo:rerun-if-changed={}", absolute_path.display());

                Some((file_name, absolute_path.to_str()?.replace('\\', "/")))
            })
            .collect();
    }

    // Sort for consistent ordering
    template_files.sort_by(|a, b| a.0.cmp(&b.0));

    let mut generated = String::new();
    generated.push_str("/// Page templates compiled into the binary, as `(name, source)` pairs.\n");
    generated.push_str("pub const EMBEDDED_TEMPLATES: &[(&str, &str)] = &[\n");
    for (name, path) in &template_files {
        generated.push_str(&format!(
            "    (\"{}\", include_str!(\"{}\")),\n",
            name, path
        ));
    }
    generated.push_str("];\n");

    fs::write(&dest_path, generated).unwrap();
}
