use std::path::Path;

use crate::param::{MIME_TYPES, OCTET_STREAM};

pub struct HtmlBuilder {
    title: String,
    css: String,
    body: String,
}

impl HtmlBuilder {
    pub fn from_status_code(code: u16, information: &str) -> Self {
        let title = format!("Error {}", code);
        let css = r"
        body { font-family: Arial, sans-serif; text-align: center; padding: 50px; }
        h1 { color: #e74c3c; }
        p { color: #7f8c8d; }
    "
        .to_string();
        let body = format!(
            r"
    <h1>Error {} - {}</h1>
    <p>The server could not process your request.</p>
",
            code, information
        );
        Self { title, css, body }
    }

    pub fn build(&self) -> String {
        format!(
            r##"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{}</title>
    <style>{}</style>
</head>
<body>{}</body>
</html>"##,
            self.title, self.css, self.body
        )
    }
}

/// 根据扩展名（不区分大小写）推断 Content-Type
pub fn get_mime(path: &Path) -> &'static str {
    let extension = match path.extension().and_then(|e| e.to_str()) {
        Some(e) => e.to_ascii_lowercase(),
        None => return OCTET_STREAM,
    };
    match MIME_TYPES.get(extension.as_str()) {
        Some(&v) => v,
        None => OCTET_STREAM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_builder_structure() {
        let html = HtmlBuilder::from_status_code(404, "Not Found").build();

        assert!(html.contains("<!DOCTYPE html>"));
        assert!(html.contains("<title>Error 404</title>"));
        assert!(html.contains("<h1>Error 404 - Not Found</h1>"));
        assert!(html.contains("<style>"));
        assert!(html.contains("</html>"));
        assert!(html.contains("charset=\"utf-8\""));
    }

    #[test]
    fn test_html_builder_various_codes() {
        for (code, info) in [(400, "Bad Request"), (403, "Forbidden"), (500, "Internal Server Error")] {
            let html = HtmlBuilder::from_status_code(code, info).build();
            assert!(html.contains(&code.to_string()));
            assert!(html.contains(info));
        }
    }

    #[test]
    fn test_get_mime_table() {
        for (file, mime) in [
            ("index.html", "text/html; charset=utf-8"),
            ("site.css", "text/css; charset=utf-8"),
            ("app.js", "application/javascript; charset=utf-8"),
            ("a.jpg", "image/jpeg"),
            ("a.jpeg", "image/jpeg"),
            ("a.png", "image/png"),
            ("a.gif", "image/gif"),
            ("favicon.ico", "image/x-icon"),
            ("notes.txt", "text/plain; charset=utf-8"),
            ("data.json", "application/json; charset=utf-8"),
            ("feed.xml", "application/xml; charset=utf-8"),
        ] {
            assert_eq!(get_mime(Path::new(file)), mime, "{}", file);
        }
    }

    #[test]
    fn test_get_mime_case_insensitive() {
        assert_eq!(get_mime(Path::new("INDEX.HTML")), "text/html; charset=utf-8");
    }

    #[test]
    fn test_get_mime_unknown() {
        assert_eq!(get_mime(Path::new("archive.pdf")), OCTET_STREAM);
        assert_eq!(get_mime(Path::new("Makefile")), OCTET_STREAM);
    }
}
