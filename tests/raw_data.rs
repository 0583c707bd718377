//! Raw data send path through the addon facade.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use conn_addons::diagnostics::{LogFormat, SharedSink};
use conn_addons::net::{ChannelTransport, Connection, RawData, TransportError};
use conn_addons::AddonHost;

mod common;

#[test]
fn missing_payload_logs_once_and_never_sends() {
    let conn = common::connection(true);
    let (mem, sink) = common::memory_sink();
    conn.log_into_stream(Some(&sink));

    conn.send_raw_data("config", None).unwrap();

    assert!(conn.transport().sent().is_empty());
    let lines = mem.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("[Information]"));
    assert!(lines[0].contains(&conn.id().to_string()));
}

#[test]
fn missing_payload_is_silent_when_disabled_or_detached() {
    let disabled = common::connection(false);
    let (mem, sink) = common::memory_sink();
    disabled.log_into_stream(Some(&sink));
    disabled.send_raw_data("config", None).unwrap();
    assert!(mem.is_empty());
    assert!(disabled.transport().sent().is_empty());

    let detached = common::connection(true);
    detached.send_raw_data("config", None).unwrap();
    assert!(detached.transport().sent().is_empty());
}

#[test]
fn payload_is_sent_exactly_once_as_raw_data() {
    let conn = common::connection(true);
    let (mem, sink) = common::memory_sink();
    conn.log_into_stream(Some(&sink));

    conn.send_raw_data("frame", Some(&[1u8, 2, 3])).unwrap();

    let sent = conn.transport().sent();
    assert_eq!(sent.len(), 1);
    let raw = sent[0].as_raw_data().unwrap();
    assert_eq!(raw.key(), "frame");
    assert_eq!(raw.data(), &[1u8, 2, 3]);
    assert!(mem.is_empty());
}

#[test]
fn empty_payload_is_still_sent() {
    let conn = common::connection(true);
    conn.send_raw_data("empty", Some(&[])).unwrap();
    assert_eq!(conn.transport().sent().len(), 1);
}

#[test]
fn existing_packet_is_forwarded_unmodified() {
    let conn = common::connection(true);
    let (mem, sink) = common::memory_sink();
    conn.log_into_stream(Some(&sink));

    let packet = RawData::new("prebuilt", b"payload".to_vec());
    conn.send_raw_packet(packet.clone()).unwrap();

    let sent = conn.transport().sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].as_raw_data(), Some(&packet));
    assert!(mem.is_empty());
}

#[test]
fn transport_failures_propagate() {
    let conn = Connection::with_options(common::RecordingTransport::failing(), Default::default());

    let err = conn.send_raw_data("k", Some(b"x")).unwrap_err();
    assert!(matches!(err, TransportError::Disconnected(_)));

    let err = conn.send_raw_packet(RawData::new("k", vec![])).unwrap_err();
    assert!(matches!(err, TransportError::Disconnected(_)));
    assert_eq!(conn.transport().sent().len(), 2);
}

#[test]
fn failing_sink_does_not_disturb_sends() {
    let conn = common::connection(true);
    let failing = Arc::new(common::FailingSink::default());
    let sink: SharedSink = failing.clone();
    conn.log_into_stream(Some(&sink));

    conn.send_raw_data("k", None).unwrap();
    conn.send_raw_data("k", Some(b"ok")).unwrap();

    assert_eq!(failing.attempts.load(Ordering::SeqCst), 1);
    assert_eq!(conn.transport().sent().len(), 1);
}

#[test]
fn json_diagnostics_carry_error_detail() {
    let conn = common::connection(true);
    conn.logger().set_format(LogFormat::Json);
    let (mem, sink) = common::memory_sink();
    conn.log_into_stream(Some(&sink));

    conn.send_raw_data("settings", None).unwrap();

    let value: serde_json::Value = serde_json::from_str(&mem.lines()[0]).unwrap();
    assert_eq!(value["severity"], "Information");
    assert_eq!(value["transport"], "recording");
    assert!(value["error"].as_str().unwrap().contains("settings"));
}

#[tokio::test]
async fn channel_transport_end_to_end() {
    let (transport, mut rx) = ChannelTransport::new();
    let conn = Connection::with_options(transport, Default::default());

    conn.send_raw_data("hello", Some(b"world")).unwrap();
    let packet = rx.recv().await.unwrap();
    assert_eq!(packet.as_raw_data().unwrap().data(), b"world");

    conn.close();
    assert!(matches!(
        conn.send_raw_data("hello", Some(b"again")),
        Err(TransportError::Closed)
    ));
}
