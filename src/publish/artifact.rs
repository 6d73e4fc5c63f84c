//! The generated TypeScript content file consumed by the site build.

use crate::errors::AppError;
use crate::models::ContentRecord;

/// Repository path of the generated content file.
pub const CONTENT_FILE_PATH: &str = "src/data/siteContent.ts";

const HEADER: &str = "import { SiteContent } from '../types/cms';\n\nexport const defaultSiteContent: SiteContent = ";

/// Render the content record as the source file the deployment pipeline imports.
pub fn render_content_file(record: &ContentRecord) -> Result<String, AppError> {
    let json = serde_json::to_string_pretty(record)
        .map_err(|e| AppError::Internal(format!("Failed to serialize content: {}", e)))?;
    Ok(format!("{}{};", HEADER, json))
}

/// Parse a generated content file back into a content record.
///
/// Tolerates hand edits around the declaration: everything up to the first `=` after
/// the export is treated as header, and a trailing `;` is optional.
pub fn parse_content_file(source: &str) -> Result<ContentRecord, AppError> {
    let declaration = source
        .find("export const")
        .ok_or_else(|| AppError::BadRequest("Content file has no export declaration".into()))?;
    let body_start = source[declaration..]
        .find('=')
        .map(|offset| declaration + offset + 1)
        .ok_or_else(|| AppError::BadRequest("Content file has no assignment".into()))?;

    let body = source[body_start..].trim();
    let body = body.strip_suffix(';').unwrap_or(body).trim_end();

    Ok(serde_json::from_str(body)?)
}
