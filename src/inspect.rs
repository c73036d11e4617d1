use incipit::convert::preview_docx_bytes;

type DynError = Box<dyn std::error::Error + Send + Sync + 'static>;

fn main() -> Result<(), DynError> {
    let mut args = std::env::args().skip(1).collect::<Vec<_>>();
    if args.len() != 1 {
        eprintln!("Usage: inspect <docx_file>");
        std::process::exit(2);
    }

    let path = args.remove(0);
    let package = std::fs::read(&path)?;

    let previews = preview_docx_bytes(&package)?;
    if previews.is_empty() {
        println!("no convertible notes");
        return Ok(());
    }

    for preview in &previews {
        println!("[{}] ({}) {}", preview.id, preview.kind.as_str(), preview.processed);
        println!("    raw: {}", preview.raw);
        if let Some(fingerprint) = &preview.fingerprint {
            println!("    fingerprint: {fingerprint}");
        }
    }
    println!("{} notes", previews.len());
    Ok(())
}
