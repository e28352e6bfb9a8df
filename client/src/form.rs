//! Sign-up form state.
//!
//! Mirrors the registration page: four fields, a derived validity flag that
//! gates submission, and a notification describing the outcome of a submit.

use std::fmt;

use common::RegistrationRequest;

use crate::api::{ApiError, RegistrationApi};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpForm {
    pub username: String,
    /// collected but never sent to the server
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    fn success(message: impl Into<String>) -> Self {
        Notification { kind: NotificationKind::Success, message: message.into() }
    }

    fn error(message: impl Into<String>) -> Self {
        Notification { kind: NotificationKind::Error, message: message.into() }
    }

    pub fn is_success(&self) -> bool {
        self.kind == NotificationKind::Success
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl SignUpForm {
    pub fn passwords_match(&self) -> bool {
        self.password == self.confirm_password
    }

    /// only complain once something has been typed into the confirmation
    pub fn show_password_error(&self) -> bool {
        !self.confirm_password.is_empty() && !self.passwords_match()
    }

    pub fn is_form_valid(&self) -> bool {
        !self.username.trim().is_empty()
            && !self.email.trim().is_empty()
            && !self.password.trim().is_empty()
            && !self.confirm_password.trim().is_empty()
            && self.passwords_match()
    }

    pub fn clear(&mut self) {
        *self = SignUpForm::default();
    }

    pub fn request(&self) -> RegistrationRequest {
        RegistrationRequest {
            username: self.username.as_str().into(),
            password: self.password.as_str().into(),
        }
    }

    /// Sends the credentials. The form is cleared only when the server
    /// accepted them, any failure leaves the entered values in place.
    pub fn submit(&mut self, api: &RegistrationApi) -> Notification {
        match api.register(&self.request()) {
            Ok(registered) => {
                log::info!("registration successful {}", registered.user.id);

                self.clear();

                Notification::success("Registration successful!")
            },
            Err(ApiError::Rejected { status, body }) => {
                log::error!("registration failed [{}] {:?}", status, body);

                let reason = match body {
                    Some(body) => match body.details {
                        Some(details) => format!("{} ({})", body.message, details),
                        None => body.message.into_string(),
                    },
                    None => String::from("Unknown error"),
                };

                Notification::error(format!("Registration failed: {}", reason))
            },
            Err(err) => {
                log::error!("error during registration {}", err);

                Notification::error("Registration failed: Network error")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    use url::Url;

    use super::*;

    fn filled() -> SignUpForm {
        SignUpForm {
            username: String::from("validuser"),
            email: String::from("someone@example.com"),
            password: String::from("pw1"),
            confirm_password: String::from("pw1"),
        }
    }

    /// answers exactly one request and hands back what was received
    fn respond_once(status_line: &'static str, body: &'static str) -> (Url, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let request = read_request(&mut stream);

            write!(
                stream,
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            ).unwrap();
            stream.flush().unwrap();

            request
        });

        (Url::parse(&format!("http://{}/", addr)).unwrap(), handle)
    }

    fn read_request(stream: &mut impl Read) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];

        let header_end = loop {
            let read = stream.read(&mut chunk).unwrap();

            assert!(read > 0, "connection closed before headers were complete");

            buf.extend_from_slice(&chunk[..read]);

            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
        let content_length = head.lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .map(|value| value.trim().parse::<usize>().unwrap())
            .unwrap_or(0);

        while buf.len() < header_end + content_length {
            let read = stream.read(&mut chunk).unwrap();

            if read == 0 {
                break;
            }

            buf.extend_from_slice(&chunk[..read]);
        }

        String::from_utf8_lossy(&buf).into_owned()
    }

    fn test_api(url: Url) -> RegistrationApi {
        let client = reqwest::blocking::Client::builder()
            .no_proxy()
            .build()
            .unwrap();

        RegistrationApi::with_client(client, url)
    }

    fn closed_port_url() -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        drop(listener);

        Url::parse(&format!("http://{}/", addr)).unwrap()
    }

    #[test]
    fn empty_form_is_invalid() {
        let form = SignUpForm::default();

        assert!(form.passwords_match());
        assert!(!form.show_password_error());
        assert!(!form.is_form_valid());
    }

    #[test]
    fn every_field_is_required() {
        assert!(filled().is_form_valid());

        let mut form = filled();
        form.username = String::from("   ");
        assert!(!form.is_form_valid());

        let mut form = filled();
        form.email.clear();
        assert!(!form.is_form_valid());

        let mut form = filled();
        form.password.clear();
        assert!(!form.is_form_valid());

        let mut form = filled();
        form.confirm_password.clear();
        assert!(!form.is_form_valid());
        assert!(!form.show_password_error());
    }

    #[test]
    fn mismatched_passwords() {
        let mut form = filled();
        form.confirm_password = String::from("pw2");

        assert!(!form.passwords_match());
        assert!(form.show_password_error());
        assert!(!form.is_form_valid());
    }

    #[test]
    fn request_leaves_out_email() {
        let req = filled().request();

        assert_eq!(&*req.username, "validuser");
        assert_eq!(&*req.password, "pw1");
    }

    #[test]
    fn success_clears_form() {
        let (url, server) = respond_once(
            "201 Created",
            r#"{"message":"User registered successfully","user":{"id":"67e55044-10b1-426f-9247-bb680e5fe0c8","username":"validuser","created_at":"2026-10-18T12:00:00Z"}}"#
        );
        let api = test_api(url);
        let mut form = filled();

        let notification = form.submit(&api);
        let request = server.join().unwrap();

        assert!(notification.is_success());
        assert_eq!(notification.message, "Registration successful!");
        assert_eq!(form, SignUpForm::default());

        assert!(request.starts_with("POST /api/auth/register "));
        assert!(request.contains(r#""username":"validuser""#));
        assert!(!request.contains("someone@example.com"));
    }

    #[test]
    fn server_rejection_keeps_form() {
        let (url, server) = respond_once(
            "400 Bad Request",
            r#"{"message":"Validation error","details":"\"username\" length must be at least 3 characters long"}"#
        );
        let api = test_api(url);
        let mut form = filled();
        form.username = String::from("ab");
        let before = form.clone();

        let notification = form.submit(&api);
        server.join().unwrap();

        assert_eq!(notification.kind, NotificationKind::Error);
        assert!(notification.message.starts_with("Registration failed: Validation error"));
        assert!(notification.message.contains("at least 3 characters"));
        assert_eq!(form, before);
    }

    #[test]
    fn unreadable_rejection_is_unknown_error() {
        let (url, server) = respond_once("502 Bad Gateway", "<html>bad gateway</html>");
        let api = test_api(url);
        let mut form = filled();

        let notification = form.submit(&api);
        server.join().unwrap();

        assert_eq!(notification.message, "Registration failed: Unknown error");
        assert_eq!(form, filled());
    }

    #[test]
    fn network_failure_keeps_form() {
        let api = test_api(closed_port_url());
        let mut form = filled();

        let notification = form.submit(&api);

        assert_eq!(notification.kind, NotificationKind::Error);
        assert!(notification.message.contains("Network error"));
        assert_eq!(form, filled());
    }
}
