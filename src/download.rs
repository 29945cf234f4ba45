//! Platform delivery of exported files.
//!
//! - Native: a save dialog (`rfd`) pre-filled with the file name, then a plain file write.
//! - Web: a blob URL clicked through a temporary anchor element.

use crate::export::{DownloadSink, ExportError};

/// Asks the user where to save the file, then writes it.
///
/// Must be called from within a tokio runtime; the dialog runs on a spawned task so
/// the caller is never blocked on user input.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct SaveDialogSink;

#[cfg(not(target_arch = "wasm32"))]
impl DownloadSink for SaveDialogSink {
    fn deliver(&mut self, file_name: &str, bytes: Vec<u8>) -> Result<(), ExportError> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| ExportError::Download(e.to_string()))?;
        let file_name = file_name.to_string();
        runtime.spawn(async move {
            if let Some(handle) = rfd::AsyncFileDialog::new()
                .add_filter("PDF", &["pdf"])
                .set_file_name(&file_name)
                .save_file()
                .await
            {
                let path = handle.path();
                match std::fs::write(path, &bytes) {
                    Ok(()) => log::info!("Saved {}", path.display()),
                    Err(e) => log::error!("Failed to save {}: {}", file_name, e),
                }
            }
        });
        Ok(())
    }
}

/// Triggers a browser download of the file.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserDownload;

#[cfg(target_arch = "wasm32")]
impl DownloadSink for BrowserDownload {
    fn deliver(&mut self, file_name: &str, bytes: Vec<u8>) -> Result<(), ExportError> {
        trigger_download(file_name, &bytes, "application/pdf")
            .map_err(|e| ExportError::Download(e.to_string()))
    }
}

/// Creates a temporary anchor element with a blob URL and clicks it (Firefox-compatible).
#[cfg(target_arch = "wasm32")]
fn trigger_download(filename: &str, bytes: &[u8], mime: &str) -> Result<(), &'static str> {
    use wasm_bindgen::JsCast;

    let window = web_sys::window().ok_or("No window found")?;
    let document = window.document().ok_or("No document found")?;

    let blob_parts = js_sys::Array::new();
    blob_parts.push(&js_sys::Uint8Array::from(bytes));

    let blob_options = web_sys::BlobPropertyBag::new();
    blob_options.set_type(mime);

    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&blob_parts, &blob_options)
        .map_err(|_| "Failed to create blob")?;

    let url = web_sys::Url::create_object_url_with_blob(&blob)
        .map_err(|_| "Failed to create object URL")?;

    let anchor = document
        .create_element("a")
        .map_err(|_| "Failed to create anchor element")?
        .dyn_into::<web_sys::HtmlAnchorElement>()
        .map_err(|_| "Failed to cast to anchor element")?;

    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor.style().set_property("display", "none").ok();

    let body = document.body().ok_or("No body found")?;
    body.append_child(&anchor)
        .map_err(|_| "Failed to append anchor")?;
    anchor.click();
    body.remove_child(&anchor)
        .map_err(|_| "Failed to remove anchor")?;

    web_sys::Url::revoke_object_url(&url)
        .map_err(|_| "Failed to revoke object URL")?;

    Ok(())
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn save_dialog_needs_a_runtime() {
        assert!(matches!(
            SaveDialogSink.deliver("diagram.pdf", Vec::new()),
            Err(ExportError::Download(_))
        ));
    }
}
