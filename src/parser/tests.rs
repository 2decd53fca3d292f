//! Tests for the HTTP parser.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;
    use tokio::io::AsyncWriteExt;

    use crate::parser::{Error, HttpRequest, Method, WireReader, parse_header_line, read_request};

    async fn parse(input: &[u8]) -> Result<HttpRequest, Error> {
        read_request(input, None).await
    }

    #[tokio::test]
    async fn test_parse_simple_get_request() {
        let request = b"GET /index.html HTTP/1.1\r\nHost: example.com\r\n\r\n";
        let result = parse(request).await.unwrap();
        assert_eq!(result.method, Method::GET);
        assert_eq!(result.target, "/index.html");
        assert_eq!(result.version, "HTTP/1.1");
        assert_eq!(result.headers.get("Host").unwrap(), "example.com");
        assert!(result.body.is_empty());
    }

    #[tokio::test]
    async fn test_parse_request_with_multiple_headers() {
        let request = b"GET /user-agent HTTP/1.1\r\nHost: example.com\r\nUser-Agent: test\r\nAccept: */*\r\n\r\n";
        let result = parse(request).await.unwrap();
        assert_eq!(result.headers.len(), 3);
        assert_eq!(result.headers.get("User-Agent").unwrap(), "test");
        assert_eq!(result.headers.get("Accept").unwrap(), "*/*");
    }

    #[tokio::test]
    async fn test_header_case_is_preserved_and_lookup_is_insensitive() {
        let request = b"GET / HTTP/1.1\r\nuser-AGENT: curl\r\n\r\n";
        let result = parse(request).await.unwrap();
        assert!(result.headers.contains_key("user-AGENT"));
        assert!(!result.headers.contains_key("User-Agent"));
        assert_eq!(result.get_header("User-Agent").unwrap(), "curl");
        assert!(result.has_header("USER-AGENT"));
    }

    #[tokio::test]
    async fn test_duplicate_header_last_wins() {
        let request = b"GET / HTTP/1.1\r\nX-Test: first\r\nX-Test: second\r\n\r\n";
        let result = parse(request).await.unwrap();
        assert_eq!(result.headers.get("X-Test").unwrap(), "second");
    }

    #[tokio::test]
    async fn test_header_without_separator_is_kept_whole() {
        let request = b"GET / HTTP/1.1\r\nInvalidHeader\r\nX-Test: value: with: separators\r\n\r\n";
        let result = parse(request).await.unwrap();
        assert_eq!(result.headers.get("InvalidHeader").unwrap(), "");
        assert_eq!(result.headers.get("X-Test: value: with: separators").unwrap(), "");
    }

    #[tokio::test]
    async fn test_headers_with_colons_but_single_separator() {
        let request = b"GET / HTTP/1.1\r\nX-Time: 12:30:00\r\n\r\n";
        let result = parse(request).await.unwrap();
        assert_eq!(result.headers.get("X-Time").unwrap(), "12:30:00");
    }

    #[tokio::test]
    async fn test_body_is_read_to_content_length() {
        let request = b"POST /files/sample.txt HTTP/1.1\r\nContent-Length: 11\r\n\r\nhello world";
        let result = parse(request).await.unwrap();
        assert_eq!(result.method, Method::POST);
        assert_eq!(result.body, b"hello world");
        assert_eq!(result.content_length(), Some(11));
    }

    #[tokio::test]
    async fn test_bytes_past_content_length_are_not_consumed_into_body() {
        let request = b"POST /x HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello world";
        let result = parse(request).await.unwrap();
        assert_eq!(result.body, b"hello");
    }

    #[tokio::test]
    async fn test_missing_or_garbled_content_length_means_empty_body() {
        let request = b"POST /x HTTP/1.1\r\n\r\nignored";
        assert!(parse(request).await.unwrap().body.is_empty());

        let request = b"POST /x HTTP/1.1\r\nContent-Length: eleven\r\n\r\nignored";
        let result = parse(request).await.unwrap();
        assert!(result.body.is_empty());
        assert_eq!(result.content_length(), None);

        let request = b"POST /x HTTP/1.1\r\nContent-Length: -4\r\n\r\nignored";
        assert!(parse(request).await.unwrap().body.is_empty());
    }

    #[tokio::test]
    async fn test_padded_content_length_is_not_a_length() {
        let request = b"POST /x HTTP/1.1\r\nContent-Length:  3\r\n\r\nabc";
        let result = parse(request).await.unwrap();
        assert_eq!(result.get_header("Content-Length"), Some(&" 3".to_string()));
        assert_eq!(result.content_length(), None);
        assert!(result.body.is_empty());
    }

    #[tokio::test]
    async fn test_non_utf8_line_is_rejected() {
        let result = parse(b"GET /user-agent HTTP/1.1\r\nUser-Agent: caf\xE9\r\n\r\n").await;
        assert!(matches!(result, Err(Error::InvalidEncoding(_))));

        let result = parse(b"GET /echo/caf\xE9 HTTP/1.1\r\n\r\n").await;
        assert!(matches!(result, Err(Error::InvalidEncoding(_))));
    }

    #[tokio::test]
    async fn test_utf8_line_is_kept_verbatim() {
        let result = parse("GET /echo/café HTTP/1.1\r\nUser-Agent: café\r\n\r\n".as_bytes())
            .await
            .unwrap();
        assert_eq!(result.target, "/echo/café");
        assert_eq!(result.get_header("User-Agent").map(String::as_bytes), Some("café".as_bytes()));
    }

    #[tokio::test]
    async fn test_line_length_limit() {
        // The terminator counts towards the limit.
        let mut reader = WireReader::new(&b"GET / HTTP/1.1\r\nX-Long: aaaaaaaaaaaaaaaa\r\n"[..]).with_max_line(16);
        assert_eq!(reader.read_line().await.unwrap().as_deref(), Some("GET / HTTP/1.1"));
        assert!(matches!(reader.read_line().await, Err(Error::LineTooLong(16))));
    }

    #[tokio::test]
    async fn test_line_without_terminator_does_not_grow_forever() {
        let (mut client, server) = tokio::io::duplex(1024);
        client.write_all(&[b'a'; 100]).await.unwrap();

        let mut reader = WireReader::new(server).with_max_line(32);
        let result = reader.read_request(None).await;
        assert!(matches!(result, Err(Error::LineTooLong(32))));

        drop(client);
    }

    #[tokio::test]
    async fn test_binary_body_is_preserved() {
        let mut request = b"POST /files/blob HTTP/1.1\r\nContent-Length: 4\r\n\r\n".to_vec();
        request.extend_from_slice(&[0x00, 0xff, b'\r', b'\n']);
        let result = parse(&request).await.unwrap();
        assert_eq!(result.body, vec![0x00, 0xff, b'\r', b'\n']);
    }

    #[tokio::test]
    async fn test_incomplete_body() {
        let request = b"POST /x HTTP/1.1\r\nContent-Length: 10\r\n\r\nshort";
        let result = parse(request).await;
        assert!(matches!(
            result,
            Err(Error::IncompleteBody { expected: 10, received: 5 })
        ));
    }

    #[tokio::test]
    async fn test_body_timeout_is_distinct_from_eof() {
        let (mut client, server) = tokio::io::duplex(1024);
        client
            .write_all(b"POST /x HTTP/1.1\r\nContent-Length: 10\r\n\r\nabc")
            .await
            .unwrap();

        let deadline = Duration::from_millis(50);
        let result = read_request(server, Some(deadline)).await;
        assert!(matches!(result, Err(Error::BodyTimeout(d)) if d == deadline));

        // Keep the writer alive until the deadline has passed.
        drop(client);
    }

    #[tokio::test]
    async fn test_body_within_deadline() {
        let request = b"POST /x HTTP/1.1\r\nContent-Length: 3\r\n\r\nabc";
        let result = read_request(&request[..], Some(Duration::from_secs(5))).await.unwrap();
        assert_eq!(result.body, b"abc");
    }

    #[tokio::test]
    async fn test_empty_request() {
        let result = parse(b"").await;
        assert!(matches!(result, Err(Error::EmptyRequest)));
    }

    #[tokio::test]
    async fn test_incomplete_request_line() {
        let result = parse(b"GET\r\n\r\n").await;
        assert!(matches!(result, Err(Error::MalformedRequestLine(ref l)) if l == "GET"));
    }

    #[tokio::test]
    async fn test_request_line_with_too_many_tokens() {
        let result = parse(b"GET /a b HTTP/1.1\r\n\r\n").await;
        assert!(matches!(result, Err(Error::MalformedRequestLine(_))));

        // Double spaces produce an extra empty token.
        let result = parse(b"GET  /a HTTP/1.1\r\n\r\n").await;
        assert!(matches!(result, Err(Error::MalformedRequestLine(_))));
    }

    #[tokio::test]
    async fn test_unterminated_head() {
        let result = parse(b"GET / HTTP/1.1\r\nHost: example.com\r\n").await;
        assert!(matches!(result, Err(Error::IncompleteHead)));

        let result = parse(b"GET / HTTP/1.1").await;
        assert!(matches!(result, Err(Error::IncompleteHead)));
    }

    #[tokio::test]
    async fn test_unusual_targets_are_not_rejected() {
        let result = parse(b"GET  HTTP/1.1\r\n\r\n").await.unwrap();
        assert_eq!(result.target, "");

        let result = parse(b"GET echo/abc HTTP/1.1\r\n\r\n").await.unwrap();
        assert_eq!(result.target, "echo/abc");
    }

    #[tokio::test]
    async fn test_unknown_method_and_version_are_kept() {
        let result = parse(b"BREW /pot HTCPCP/1.0\r\n\r\n").await.unwrap();
        assert_eq!(result.method, Method::Extension("BREW".to_string()));
        assert_eq!(result.version, "HTCPCP/1.0");
    }

    #[tokio::test]
    async fn test_all_methods() {
        let methods = vec![
            ("GET", Method::GET),
            ("POST", Method::POST),
            ("PUT", Method::PUT),
            ("DELETE", Method::DELETE),
            ("HEAD", Method::HEAD),
            ("OPTIONS", Method::OPTIONS),
            ("PATCH", Method::PATCH),
        ];

        for (token, expected_method) in methods {
            let request = format!("{token} /index.html HTTP/1.1\r\n\r\n");
            let result = parse(request.as_bytes()).await.unwrap();
            assert_eq!(result.method, expected_method);
        }
    }

    #[tokio::test]
    async fn test_wire_reader_lines() {
        let input = b"first\r\nsecond\n\r\nlast";
        let mut reader = WireReader::new(&input[..]);
        assert_eq!(reader.read_line().await.unwrap().as_deref(), Some("first"));
        assert_eq!(reader.read_line().await.unwrap().as_deref(), Some("second"));
        assert_eq!(reader.read_line().await.unwrap().as_deref(), Some(""));
        assert!(matches!(reader.read_line().await, Err(Error::IncompleteHead)));
        assert!(reader.read_line().await.unwrap().is_none());
    }

    #[test]
    fn test_method_display() {
        assert_eq!(Method::GET.to_string(), "GET");
        assert_eq!(Method::POST.to_string(), "POST");
        assert_eq!(Method::PATCH.to_string(), "PATCH");
        assert_eq!(Method::Extension("PURGE".to_string()).to_string(), "PURGE");
        assert_eq!(Method::from("DELETE"), Method::DELETE);
    }

    #[test]
    fn test_parse_header_line() {
        assert_eq!(
            parse_header_line("Content-Type: text/plain"),
            ("Content-Type".to_string(), "text/plain".to_string())
        );
        assert_eq!(
            parse_header_line("X-Empty: "),
            ("X-Empty".to_string(), String::new())
        );
        assert_eq!(parse_header_line("NoColon"), ("NoColon".to_string(), String::new()));
        assert_eq!(parse_header_line("Tight:value"), ("Tight:value".to_string(), String::new()));
    }

    #[test]
    fn test_content_length_lookup() {
        let mut headers = HashMap::new();
        headers.insert("content-length".to_string(), "42".to_string());
        let request = HttpRequest::new(Method::POST, "/", "HTTP/1.1", headers);
        assert_eq!(request.content_length(), Some(42));
    }
}
