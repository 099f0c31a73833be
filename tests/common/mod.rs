//! Fixtures shared by the integration tests

#![allow(dead_code)]

use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::thread;

/// Serve `/missing.pdf` as 404 and any other path as a small PDF
///
/// Returns the base URL. The server stops after `requests` connections.
pub fn serve_pdfs(requests: usize) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        for stream in listener.incoming().take(requests) {
            let mut stream = stream.unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap() > 0 {
                if line == "\r\n" {
                    break;
                }
                line.clear();
            }

            let path = request_line.split_whitespace().nth(1).unwrap_or("/").to_string();
            let (status, body) = if path.ends_with("/missing.pdf") {
                ("404 Not Found", "not here".to_string())
            } else {
                ("200 OK", format!("%PDF-1.4\n% {}\n%%EOF\n", path))
            };

            let _ = write!(
                stream,
                "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
        }
    });

    format!("http://{}", addr)
}

/// Preflight stand-in: picks a canned report by the PDF's file name
#[cfg(unix)]
const FAKE_JAVA: &str = r#"#!/bin/sh
case "$4" in
  *clean.pdf)
    echo '<preflight name="clean.pdf"><isValid type="PDF/A1-b">true</isValid></preflight>'
    ;;
  *errors.pdf)
    echo '<preflight name="errors.pdf"><isValid type="PDF/A1-b">false</isValid><errors count="3">'
    echo '<error><code>2.4.3</code><details>Invalid Color space, *DeviceRGB* used</details></error>'
    echo '<error><code>1.2.1</code><details>Body Syntax error</details></error>'
    echo '<error><code>2.4.3</code><details>Invalid Color space, second use</details></error>'
    echo '</errors></preflight>'
    ;;
  *exception.pdf)
    echo '<preflight name="exception.pdf"><exceptionThrown><message>Stream ended early</message></exceptionThrown></preflight>'
    ;;
  *)
    echo 'this is not xml'
    ;;
esac
exit 0
"#;

/// Lay out a config.xml, a fake Java interpreter and an empty Preflight jar
///
/// Returns the config file path.
#[cfg(unix)]
pub fn install_fake_preflight(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let java = dir.join("java");
    fs::write(&java, FAKE_JAVA).unwrap();
    fs::set_permissions(&java, fs::Permissions::from_mode(0o755)).unwrap();

    fs::create_dir_all(dir.join("preflight")).unwrap();
    fs::write(dir.join("preflight").join("preflight-app.jar"), b"").unwrap();

    let config = dir.join("config.xml");
    fs::write(&config, "<config><java>java</java></config>").unwrap();
    config
}

/// Write a URL list, one URL per line
pub fn write_url_list(dir: &Path, urls: &[String]) -> PathBuf {
    let path = dir.join("urls.txt");
    fs::write(&path, urls.join("\n")).unwrap();
    path
}
