use std::net::{SocketAddr, UdpSocket};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use mockito::Matcher;
use pmoigd::{IgdConfig, IgdError, MappingInput, add_port_mapping, find_gateway};

/// Answers the first M-SEARCH with `answers`, returns the M-SEARCH text.
fn spawn_responder(answers: Vec<String>) -> (SocketAddr, JoinHandle<String>) {
    let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
    socket
        .set_read_timeout(Some(Duration::from_secs(5)))
        .unwrap();
    let addr = socket.local_addr().unwrap();

    let handle = thread::spawn(move || {
        let mut buf = [0u8; 2048];
        let (n, from) = socket.recv_from(&mut buf).unwrap();
        for answer in answers {
            socket.send_to(answer.as_bytes(), from).unwrap();
        }
        String::from_utf8_lossy(&buf[..n]).into_owned()
    });
    (addr, handle)
}

fn search_response(st: &str, location: &str) -> String {
    format!(
        "HTTP/1.1 200 OK\r\n\
         CACHE-CONTROL: max-age=120\r\n\
         ST: {st}\r\n\
         USN: uuid:igd-test::{st}\r\n\
         EXT:\r\n\
         SERVER: Linux/3.14 UPnP/1.0 IGD/1.0\r\n\
         LOCATION: {location}\r\n\
         \r\n"
    )
}

fn config_for(ssdp: SocketAddr) -> IgdConfig {
    IgdConfig {
        multicast_address: ssdp.to_string(),
        search_window_ms: 400,
        internal_client: Some("192.168.1.2".to_string()),
        http_timeout_secs: 5,
        ..IgdConfig::default()
    }
}

#[test]
fn test_add_port_mapping_end_to_end() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/desc.xml/ctl/IPConn")
        .match_header(
            "SOAPAction",
            "\"urn:schemas-upnp-org:service:WANIPConnection:1#AddPortMapping\"",
        )
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("<NewExternalPort>2222</NewExternalPort>".to_string()),
            Matcher::Regex("<NewInternalPort>22</NewInternalPort>".to_string()),
            Matcher::Regex("<NewProtocol>TCP</NewProtocol>".to_string()),
            Matcher::Regex("<NewLeaseDuration>10</NewLeaseDuration>".to_string()),
        ]))
        .with_status(200)
        .with_body("<ok/>")
        .create();

    let location = format!("{}/desc.xml", server.url());
    let (ssdp, responder) = spawn_responder(vec![
        search_response("upnp:rootdevice", "http://127.0.0.1:1/ignored.xml"),
        search_response(
            "urn:schemas-upnp-org:device:InternetGatewayDevice:1",
            &location,
        ),
    ]);

    let config = config_for(ssdp);
    let mut input = MappingInput::new("2222", "22", "tcp");
    let outcome = add_port_mapping(&config, &mut input).unwrap();

    let msearch = responder.join().unwrap();
    assert!(msearch.contains("ST: ssdp:all\r\n"));

    mock.assert();
    assert_eq!(outcome.location, location);
    assert_eq!(outcome.control_url, format!("{location}/ctl/IPConn"));
    assert_eq!(outcome.request.protocol, "TCP");
    assert_eq!(outcome.response.status, 200);
    assert_eq!(outcome.response.body, b"<ok/>");
}

#[test]
fn test_no_gateway_fails_fast() {
    let (ssdp, responder) = spawn_responder(vec![search_response(
        "urn:schemas-upnp-org:device:MediaRenderer:1",
        "http://127.0.0.1:1/dmr.xml",
    )]);

    let err = find_gateway(&config_for(ssdp)).unwrap_err();
    responder.join().unwrap();

    assert!(matches!(err, IgdError::NoGatewayFound));
    assert!(!err.is_setup_fatal());
}

#[test]
fn test_invalid_input_is_rejected_before_sending() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create();

    let location = format!("{}/desc.xml", server.url());
    let (ssdp, responder) = spawn_responder(vec![search_response(
        "urn:schemas-upnp-org:device:InternetGatewayDevice:1",
        &location,
    )]);

    let mut input = MappingInput::new("70000", "22", "TCP");
    let err = add_port_mapping(&config_for(ssdp), &mut input).unwrap_err();
    responder.join().unwrap();

    assert!(matches!(err, IgdError::InvalidMapping(_)));
    mock.assert();
}

#[test]
fn test_configured_service_type_drives_header_and_namespace() {
    let ppp = "urn:schemas-upnp-org:service:WANPPPConnection:1";
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/desc.xml/ctl/PPPConn")
        .match_header("SOAPAction", format!("\"{ppp}#AddPortMapping\"").as_str())
        .match_body(Matcher::Regex(format!("xmlns:u=\"{ppp}\"")))
        .with_status(200)
        .with_body("<ok/>")
        .create();

    let location = format!("{}/desc.xml", server.url());
    let (ssdp, responder) = spawn_responder(vec![search_response(
        "urn:schemas-upnp-org:device:InternetGatewayDevice:1",
        &location,
    )]);

    let config = IgdConfig {
        service_type: ppp.to_string(),
        control_path: "/ctl/PPPConn".to_string(),
        ..config_for(ssdp)
    };
    let mut input = MappingInput::new("2222", "22", "UDP");
    let outcome = add_port_mapping(&config, &mut input).unwrap();
    responder.join().unwrap();

    mock.assert();
    assert!(outcome.response.is_success());
}
