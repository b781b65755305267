//! Transport controller behavior against a scripted renderer

mod common;

use std::sync::{Arc, Mutex};

use common::{device, device_with_codec, fast_config, protocol_info_body, Reply, ScriptedInvoker};
use dlna_api::{ActionHooks, ControlError, ControllerConfig, TrackMetadata, TransportController};
use dlna_discovery::{Codec, ControlAction, Device, HookPoint, TransportState, Workaround};
use rstest::rstest;
use soap_client::descendant_text;
use xmltree::Element;

#[derive(Debug, Default)]
struct Recorder {
    events: Mutex<Vec<String>>,
}

impl Recorder {
    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl ActionHooks for Recorder {
    fn before(&self, action: ControlAction, _device: &Device) {
        self.events.lock().unwrap().push(format!("before {}", action));
    }

    fn after(&self, action: ControlAction, device: &Device) {
        self.events.lock().unwrap().push(format!("after {} ({})", action, device.state));
    }
}

#[derive(Debug, Default)]
struct CountingWorkaround {
    hooks: Mutex<Vec<HookPoint>>,
}

impl Workaround for CountingWorkaround {
    fn name(&self) -> &str {
        "CountingWorkaround"
    }

    fn run(&self, hook: HookPoint, _device: &Device) {
        self.hooks.lock().unwrap().push(hook);
    }
}

#[test]
fn test_state_transitions() {
    let invoker = ScriptedInvoker::new()
        .reply("Play", Reply::ok())
        .reply("Pause", Reply::ok())
        .reply("Stop", Reply::ok());
    let mut controller =
        TransportController::with_invoker(device(), invoker, ControllerConfig::new());
    assert_eq!(controller.state(), TransportState::Idle);

    controller.play().unwrap();
    assert_eq!(controller.state(), TransportState::Playing);

    controller.pause().unwrap();
    assert_eq!(controller.state(), TransportState::Paused);

    // A successful stop returns to idle, not stopped
    controller.stop().unwrap();
    assert_eq!(controller.state(), TransportState::Idle);
}

#[rstest]
#[case(Reply::Status(500, String::new()), 500)]
#[case(Reply::Status(401, String::new()), 401)]
#[case(Reply::Timeout, 408)]
#[case(Reply::Refused, 404)]
fn test_failed_play_keeps_state(#[case] reply: Reply, #[case] expected: u16) {
    let invoker = ScriptedInvoker::new().reply("Play", reply);
    let mut controller =
        TransportController::with_invoker(device(), invoker, ControllerConfig::new());

    let err = controller.play().unwrap_err();
    assert_eq!(err.status_code(), expected);
    assert_eq!(controller.state(), TransportState::Idle);
}

#[test]
fn test_hooks_wrap_actions_even_on_failure() {
    let workaround = Arc::new(CountingWorkaround::default());
    let mut device = device_with_codec();
    device.workarounds.push(workaround.clone());

    let invoker = ScriptedInvoker::new()
        .reply("SetAVTransportURI", Reply::ok())
        .reply("Play", Reply::Status(500, String::new()))
        .reply("Stop", Reply::ok());
    let recorder = Arc::new(Recorder::default());
    let mut controller =
        TransportController::with_invoker(device, invoker, ControllerConfig::new());
    controller.add_hooks(recorder.clone());

    controller.register("http://192.168.1.2:8080/stream.mp3", None, &TrackMetadata::new()).unwrap();
    assert!(controller.play().is_err());
    controller.stop().unwrap();

    assert_eq!(
        recorder.events(),
        vec![
            "before register",
            "after register (idle)",
            "before play",
            "after play (idle)",
            "before stop",
            "after stop (idle)",
        ]
    );
    assert_eq!(
        *workaround.hooks.lock().unwrap(),
        vec![
            HookPoint::Before(ControlAction::Register),
            HookPoint::After(ControlAction::Register),
            HookPoint::Before(ControlAction::Play),
            HookPoint::After(ControlAction::Play),
            HookPoint::Before(ControlAction::Stop),
            HookPoint::After(ControlAction::Stop),
        ]
    );
}

#[test]
fn test_get_protocol_info_negotiates_codecs() {
    let sink = "http-get:*:audio/wav:*, http-get:*:audio/mpeg:DLNA.ORG_PN=MP3,http-get:*:video/mp4:*,\
                http-get:*:audio/mpeg:*,broken-entry,http-get:*:audio/flac:*";
    let invoker = ScriptedInvoker::new()
        .reply("GetProtocolInfo", Reply::Status(200, protocol_info_body(sink)));
    let mut controller =
        TransportController::with_invoker(device(), invoker, ControllerConfig::new());

    controller.get_protocol_info().unwrap();

    let device = controller.device();
    assert_eq!(device.mime_types, vec!["audio/wav", "audio/mpeg", "video/mp4", "audio/flac"]);
    assert_eq!(
        device.codecs,
        vec![
            Codec::new("audio/mpeg", 18),
            Codec::new("audio/flac", 16),
            Codec::new("audio/wav", 14),
        ]
    );
    assert_eq!(
        controller.invoker().requests()[0].url,
        "http://192.168.1.5:8080/ConnectionManager/control"
    );
}

#[rstest]
#[case(Reply::Status(200, "<html><body>oops".to_string()), 400)]
#[case(Reply::Timeout, 408)]
#[case(Reply::Status(503, String::new()), 503)]
#[case(Reply::Status(200, protocol_info_body("")), 400)]
fn test_get_protocol_info_failures(#[case] reply: Reply, #[case] expected: u16) {
    let invoker = ScriptedInvoker::new().reply("GetProtocolInfo", reply);
    let mut controller =
        TransportController::with_invoker(device(), invoker, ControllerConfig::new());

    let err = controller.get_protocol_info().unwrap_err();
    assert_eq!(err.status_code(), expected);
    assert!(controller.device().codecs.is_empty());
}

#[test]
fn test_register_embeds_escaped_metadata() {
    let invoker = ScriptedInvoker::new().reply("SetAVTransportURI", Reply::ok());
    let mut controller =
        TransportController::with_invoker(device_with_codec(), invoker, ControllerConfig::new());
    let track = TrackMetadata::new().with_title("Jazz & Blues").with_artist("Desktop");

    controller.register("http://192.168.1.2:8080/stream.mp3", None, &track).unwrap();

    let request = &controller.invoker().requests()[0];
    assert_eq!(request.action, "SetAVTransportURI");
    assert!(!request.payload.contains("<DIDL-Lite"));

    let envelope = Element::parse(request.envelope().as_bytes()).unwrap();
    assert_eq!(
        descendant_text(&envelope, "CurrentURI").as_deref(),
        Some("http://192.168.1.2:8080/stream.mp3")
    );

    let didl = descendant_text(&envelope, "CurrentURIMetaData").unwrap();
    assert!(didl.contains(
        "http-get:*:audio/mpeg:DLNA.ORG_OP=00;DLNA.ORG_CI=0;DLNA.ORG_FLAGS=01700000000000000000000000000000"
    ));
    let didl = Element::parse(didl.as_bytes()).unwrap();
    assert_eq!(descendant_text(&didl, "title").as_deref(), Some("Jazz & Blues"));
    assert_eq!(descendant_text(&didl, "artist").as_deref(), Some("Desktop"));
}

#[test]
fn test_hooks_wrap_register_without_codec() {
    let workaround = Arc::new(CountingWorkaround::default());
    let mut device = device();
    device.workarounds.push(workaround.clone());

    let recorder = Arc::new(Recorder::default());
    let mut controller =
        TransportController::with_invoker(device, ScriptedInvoker::new(), ControllerConfig::new());
    controller.add_hooks(recorder.clone());

    let err = controller
        .register("http://192.168.1.2:8080/stream.mp3", None, &TrackMetadata::new())
        .unwrap_err();

    assert!(matches!(err, ControlError::NoSuitableEncoder));
    assert_eq!(recorder.events(), vec!["before register", "after register (idle)"]);
    assert_eq!(
        *workaround.hooks.lock().unwrap(),
        vec![
            HookPoint::Before(ControlAction::Register),
            HookPoint::After(ControlAction::Register),
        ]
    );
    assert!(controller.invoker().requests().is_empty());
}

#[test]
fn test_register_prefers_explicit_codec() {
    let invoker = ScriptedInvoker::new().reply("SetAVTransportURI", Reply::ok());
    let mut controller =
        TransportController::with_invoker(device_with_codec(), invoker, ControllerConfig::new());

    let flac = Codec::new("audio/flac", 16);
    controller.register("http://h/stream.flac", Some(&flac), &TrackMetadata::new()).unwrap();

    let envelope = controller.invoker().requests()[0].envelope();
    assert!(envelope.contains("http-get:*:audio/flac:"));
    assert!(!envelope.contains("audio/mpeg"));
}

#[test]
fn test_get_transport_info_returns_raw_state() {
    let invoker =
        ScriptedInvoker::new().reply("GetTransportInfo", Reply::state("NO_MEDIA_PRESENT"));
    let controller = TransportController::with_invoker(device(), invoker, ControllerConfig::new());

    assert_eq!(controller.get_transport_info().unwrap(), "NO_MEDIA_PRESENT");
}

#[test]
fn test_update_current_state_polls_until_stopped() {
    let invoker = ScriptedInvoker::new()
        .reply("GetTransportInfo", Reply::state("TRANSITIONING"))
        .reply("GetTransportInfo", Reply::state("TRANSITIONING"))
        .reply("GetTransportInfo", Reply::state("STOPPED"));
    let config = ControllerConfig::new()
        .with_state_polling(std::time::Duration::from_millis(5), std::time::Duration::from_secs(2));
    let mut controller = TransportController::with_invoker(device(), invoker, config);

    assert!(controller.update_current_state().unwrap());
    assert_eq!(controller.state(), TransportState::Stopped);
    assert_eq!(controller.invoker().count("GetTransportInfo"), 3);
}

#[test]
fn test_update_current_state_playing() {
    let invoker = ScriptedInvoker::new().reply("GetTransportInfo", Reply::state("PLAYING"));
    let mut controller = TransportController::with_invoker(device(), invoker, fast_config());

    assert!(controller.update_current_state().unwrap());
    assert_eq!(controller.state(), TransportState::Playing);
}

#[rstest]
#[case(Reply::Timeout)]
#[case(Reply::Status(500, String::new()))]
#[case(Reply::Status(200, "not xml".to_string()))]
fn test_update_current_state_aborts_on_failed_poll(#[case] reply: Reply) {
    let invoker = ScriptedInvoker::new().reply("GetTransportInfo", reply);
    let mut controller = TransportController::with_invoker(device(), invoker, fast_config());

    assert!(!controller.update_current_state().unwrap());
    assert_eq!(controller.invoker().count("GetTransportInfo"), 1);
    assert_eq!(controller.state(), TransportState::Idle);
}

#[test]
fn test_update_current_state_propagates_refusal() {
    let invoker = ScriptedInvoker::new().reply("GetTransportInfo", Reply::Refused);
    let mut controller = TransportController::with_invoker(device(), invoker, fast_config());

    assert!(matches!(
        controller.update_current_state(),
        Err(ControlError::ConnectionRefused(_))
    ));
}

#[test]
fn test_activate_rejects_incomplete_device() {
    let mut device = device();
    device.services.retain(|service| service.kind != dlna_discovery::ServiceKind::Rendering);

    let invoker = ScriptedInvoker::new();
    let mut controller =
        TransportController::with_invoker(device, invoker, ControllerConfig::new());

    assert!(matches!(
        controller.activate(),
        Err(ControlError::MissingService(dlna_discovery::ServiceKind::Rendering))
    ));
    assert!(controller.invoker().requests().is_empty());
}

#[test]
fn test_activate_fetches_protocol_info() {
    let invoker = ScriptedInvoker::new().reply(
        "GetProtocolInfo",
        Reply::Status(200, protocol_info_body("http-get:*:audio/flac:*")),
    );
    let mut controller =
        TransportController::with_invoker(device(), invoker, ControllerConfig::new());

    controller.activate().unwrap();
    assert_eq!(controller.device().preferred_codec(), Some(&Codec::new("audio/flac", 16)));
}
