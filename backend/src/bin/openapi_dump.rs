//! Print the OpenAPI document as JSON on stdout.

use utoipa::OpenApi;

fn main() -> Result<(), serde_json::Error> {
    println!("{}", backend::ApiDoc::openapi().to_pretty_json()?);
    Ok(())
}
