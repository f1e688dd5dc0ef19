//! Generated content pushed into views: the load-failure notice and the
//! home-page history sync script.

use skiff_types::error::Result;

use crate::history::HistoryLog;

/// `localStorage` key the home page reads its history from.
pub const HISTORY_STORAGE_KEY: &str = "browserHistory";

/// Escape text for inclusion in HTML content or a quoted attribute.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// "Page not found" document shown in place of the engine's error page.
pub fn notice_page_html(failed_url: &str, home_url: &str) -> String {
    let url = escape_html(failed_url);
    let home = escape_html(home_url);
    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>Page Not Found</title>\n\
         <style>\n\
         body {{ font-family: sans-serif; background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); \
         color: white; display: flex; justify-content: center; align-items: center; height: 100vh; margin: 0; }}\n\
         .notice {{ text-align: center; padding: 40px; background: rgba(0,0,0,0.3); border-radius: 15px; max-width: 600px; }}\n\
         .url {{ background: rgba(255,255,255,0.2); padding: 10px; border-radius: 5px; word-break: break-all; margin: 20px 0; }}\n\
         button, a.button {{ background: #4a9eff; color: white; border: none; padding: 12px 30px; font-size: 16px; \
         border-radius: 25px; cursor: pointer; margin: 5px; text-decoration: none; display: inline-block; }}\n\
         </style>\n\
         </head>\n\
         <body>\n\
         <div class=\"notice\">\n\
         <h1>Page Not Found</h1>\n\
         <p>Unable to load the requested page</p>\n\
         <div class=\"url\">{url}</div>\n\
         <p>Please check the URL and try again</p>\n\
         <button onclick=\"window.history.back()\">Go Back</button>\n\
         <a class=\"button\" href=\"{home}\">Home</a>\n\
         </div>\n\
         </body>\n\
         </html>\n"
    )
}

/// Script storing the serialized history log in the page's `localStorage`.
///
/// The JSON document is itself encoded as a JSON string, which is a valid
/// JavaScript string literal, so titles containing quotes cannot break out.
pub fn history_sync_script(log: &HistoryLog) -> Result<String> {
    let document = serde_json::to_string(log.entries())?;
    let literal = serde_json::to_string(&document)?;
    Ok(format!(
        "localStorage.setItem('{HISTORY_STORAGE_KEY}', {literal});"
    ))
}
