use synthetic_patients_api::router::ApiDoc;
use utoipa::OpenApi;

/// Writes the OpenAPI document of the service to `path`.
fn write_document(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let document = ApiDoc::openapi().to_pretty_json()?;
    std::fs::write(path, document)?;
    println!("OpenAPI document written to {path}");
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "openapi.json".to_string());
    write_document(&path)
}
