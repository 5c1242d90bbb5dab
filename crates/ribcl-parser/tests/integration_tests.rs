use ribcl_parser::{
    Backplane, Node, ParseError, Parser, ResponseStatus, StorageSummary, TraceEvent,
    parse_response, response_status, response_statuses,
};
use rstest::{fixture, rstest};
use std::sync::{Arc, Mutex};

const EMBEDDED_HEALTH: &str = include_str!("fixtures/embedded_health.xml");
const BACKPLANE: &str = include_str!("fixtures/backplane.xml");
const LOGIN_FAILURE: &str = include_str!("fixtures/login_failure.xml");

#[fixture]
fn health_roots() -> Vec<Node> {
    parse_response(EMBEDDED_HEALTH)
}

#[rstest]
#[case::embedded_health(EMBEDDED_HEALTH, 3)]
#[case::backplane(BACKPLANE, 1)]
#[case::login_failure(LOGIN_FAILURE, 2)]
fn test_documents_found(#[case] response: &str, #[case] expected: usize) {
    let roots = parse_response(response);
    assert_eq!(roots.len(), expected);
    assert!(roots.iter().all(|root| root.tag() == "RIBCL"));
}

#[rstest]
fn test_multiline_tag_and_single_quoted_attribute(health_roots: Vec<Node>) {
    let response = health_roots[0].find("RESPONSE").unwrap();
    assert_eq!(response.get("STATUS"), Some("0x0000"));
    assert_eq!(response.get("MESSAGE"), None);
    assert_eq!(response.get_or("MESSAGE", "N/A"), "N/A");
    assert!(response.children().is_empty());
}

#[rstest]
fn test_health_tree_navigation(health_roots: Vec<Node>) {
    let root = &health_roots[1];

    let storage = root.find("GET_EMBEDDED_HEALTH_DATA/STORAGE").unwrap();
    assert_eq!(
        storage
            .children()
            .iter()
            .map(Node::tag)
            .collect::<Vec<_>>(),
        vec!["DISCOVERY_STATUS", "CONTROLLER"]
    );

    let serials = root
        .find_all(".//PHYSICAL_DRIVE")
        .into_iter()
        .filter_map(|drive| drive.find("SERIAL_NUMBER"))
        .map(|serial| serial.get_or("VALUE", ""))
        .collect::<Vec<_>>();
    assert_eq!(serials, vec!["S2M3NX0J", "S2M3NX1K"]);

    let labels = root.find_all("GET_EMBEDDED_HEALTH_DATA/STORAGE/CONTROLLER/LOGICAL_DRIVE/PHYSICAL_DRIVE/LABEL");
    assert_eq!(labels.len(), 2);
}

#[rstest]
fn test_storage_summary(health_roots: Vec<Node>) {
    let summary = StorageSummary::from_roots(&health_roots);

    assert_eq!(summary.discovery_status.as_deref(), Some("Discovery Complete"));
    assert_eq!(summary.controllers.len(), 1);

    let controller = summary.controller("Smart Array P440ar").unwrap();
    assert_eq!(controller.label.as_deref(), Some("Controller on System Board"));
    assert_eq!(controller.status.as_deref(), Some("OK"));
    assert_eq!(controller.serial_number.as_deref(), Some("PDNLH0BRH7C1EX"));
    assert_eq!(controller.firmware_version.as_deref(), Some("1.62"));

    assert_eq!(controller.drive_enclosures.len(), 1);
    assert_eq!(controller.drive_enclosures[0].drive_bay.as_deref(), Some("1"));

    let logical = &controller.logical_drives[0];
    assert_eq!(logical.fault_tolerance.as_deref(), Some("RAID 1"));
    assert_eq!(logical.capacity.as_deref(), Some("279.4 GB"));

    let locations = controller
        .physical_drives()
        .filter_map(|drive| drive.location.as_deref())
        .collect::<Vec<_>>();
    assert_eq!(locations, vec!["Port 1I Box 1 Bay 1", "Port 1I Box 1 Bay 2"]);

    assert!(summary.controller("Smart Array P410i").is_none());
}

#[test]
fn test_backplane() {
    let backplane = Backplane::from_roots(&parse_response(BACKPLANE)).unwrap();

    assert_eq!(backplane.backplane_name.as_deref(), Some("SAS Expander Card"));
    assert_eq!(backplane.bay_count.as_deref(), Some("8"));
    assert_eq!(backplane.sep_node_id.as_deref(), Some("0x500143801234567"));
    assert_eq!(
        backplane
            .host_ports
            .iter()
            .map(|port| (port.value.as_deref(), port.node_num.as_deref()))
            .collect::<Vec<_>>(),
        vec![(Some("1"), Some("1")), (Some("2"), Some("2"))]
    );
}

#[test]
fn test_response_statuses_are_not_interpreted() {
    let roots = parse_response(LOGIN_FAILURE);

    assert_eq!(
        response_status(&roots[0]),
        Some(ResponseStatus {
            status: "0x005F",
            message: "Login credentials rejected."
        })
    );
    assert_eq!(
        response_statuses(&roots)
            .iter()
            .map(|status| status.status)
            .collect::<Vec<_>>(),
        vec!["0x005F", "0x0000"]
    );
}

#[test]
fn test_partial_success_report() {
    let report = Parser::default().parse_response_with_errors(LOGIN_FAILURE);

    assert_eq!(report.documents_found(), 3);
    assert_eq!(report.roots.len(), 2);
    assert_eq!(report.dropped.len(), 1);
    assert_eq!(report.dropped[0].index, 1);
    assert!(matches!(
        report.dropped[0].error,
        ParseError::MalformedMarkup { .. }
    ));
    assert_eq!(
        report.roots[1].find("GET_HOST_POWER").and_then(|n| n.get("HOST_POWER")),
        Some("ON")
    );
}

#[test]
fn test_round_trip_of_parsed_document() {
    let roots = parse_response(BACKPLANE);
    let serialized = roots[0].to_string();
    let reparsed = ribcl_parser::parse_document(&serialized).unwrap();
    assert_eq!(reparsed, roots[0]);
}

#[test]
fn test_parse_on_many_threads() {
    let parser = Arc::new(Parser::default());
    let handles = (0..4)
        .map(|_| {
            let parser = Arc::clone(&parser);
            std::thread::spawn(move || parser.parse_response(EMBEDDED_HEALTH).len())
        })
        .collect::<Vec<_>>();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 3);
    }

    let roots = Arc::new(parse_response(EMBEDDED_HEALTH));
    let readers = (0..4)
        .map(|_| {
            let roots = Arc::clone(&roots);
            std::thread::spawn(move || roots[1].find_all(".//PHYSICAL_DRIVE").len())
        })
        .collect::<Vec<_>>();

    for reader in readers {
        assert_eq!(reader.join().unwrap(), 2);
    }
}

#[test]
fn test_trace_counts_documents() {
    let starts = Arc::new(Mutex::new(0usize));
    let counter = Arc::clone(&starts);
    let parser = Parser::default().with_trace(move |event| {
        if let TraceEvent::DocumentStart { .. } = event {
            *counter.lock().unwrap() += 1;
        }
    });

    parser.parse_response(LOGIN_FAILURE);
    assert_eq!(*starts.lock().unwrap(), 3);
}
