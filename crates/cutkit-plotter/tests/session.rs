//! Session behavior against a scripted transport

use cutkit_core::{ConnectionError, DeviceProfile, Point, Result};
use cutkit_communication::{DeviceStatus, Transport};
use cutkit_plotter::{
    CutterSession, PlotMode, PlotRequest, SessionOptions, SetupOptions, ToolState,
};
use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;

enum Reply {
    Line(&'static str),
    WriteTimeout,
    ReadTimeout,
    Unplugged,
}

#[derive(Default)]
struct Wire {
    written: Vec<String>,
    script: VecDeque<Reply>,
}

#[derive(Clone, Default)]
struct ScriptedTransport(Arc<Mutex<Wire>>);

impl ScriptedTransport {
    fn with_script(script: Vec<Reply>) -> Self {
        let wire = Wire {
            written: Vec::new(),
            script: script.into(),
        };
        Self(Arc::new(Mutex::new(wire)))
    }

    fn written(&self) -> Vec<String> {
        self.0.lock().unwrap().written.clone()
    }
}

impl Transport for ScriptedTransport {
    fn write(&mut self, data: &[u8], _timeout: Duration) -> Result<usize> {
        let mut wire = self.0.lock().unwrap();
        if matches!(wire.script.front(), Some(Reply::WriteTimeout)) {
            wire.script.pop_front();
            return Err(ConnectionError::WriteTimeout { timeout_ms: 1 }.into());
        }
        wire.written.push(String::from_utf8_lossy(data).into_owned());
        Ok(data.len())
    }

    fn read_line(&mut self, _timeout: Duration) -> Result<String> {
        match self.0.lock().unwrap().script.pop_front() {
            None => Ok("ok".to_string()),
            Some(Reply::Line(line)) => Ok(line.to_string()),
            Some(Reply::ReadTimeout) | Some(Reply::WriteTimeout) => {
                Err(ConnectionError::ReadTimeout { timeout_ms: 1 }.into())
            }
            Some(Reply::Unplugged) => Err(ConnectionError::IoError {
                reason: "device unplugged".to_string(),
            }
            .into()),
        }
    }

    fn name(&self) -> String {
        "scripted".to_string()
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SharedBuf {
    fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.0.lock().unwrap())
            .lines()
            .map(str::to_string)
            .collect()
    }
}

fn letter_y_stem() -> PlotRequest {
    PlotRequest::new(vec![vec![
        Point::new(0.0, 0.0),
        Point::new(4.5, 10.0),
        Point::new(4.5, 20.0),
    ]])
}

fn connected(transport: &ScriptedTransport) -> CutterSession {
    CutterSession::new(
        DeviceProfile::cricut_maker1(),
        Some(Box::new(transport.clone())),
        SessionOptions::default(),
    )
}

#[test]
fn test_plot_writes_commands_then_trailer() {
    let transport = ScriptedTransport::default();
    let mut session = connected(&transport);

    let (output, delivery) = session.plot(&letter_y_stem()).unwrap();

    let expected: Vec<String> = output
        .all_commands()
        .map(|t| format!("{}\n", t.text))
        .collect();
    assert_eq!(transport.written(), expected);
    assert_eq!(
        expected,
        [
            "G01X0.000000Y0.000000F10\n",
            "G01Z-10F10\n",
            "G01X4.500000Y10.000000F10\n",
            "G01X4.500000Y20.000000F10\n",
            "G01Z0F10\n",
            "G01Y00F10\n",
        ]
    );
    assert_eq!(delivery.sent, 6);
    assert_eq!(delivery.timeouts, 0);
    assert_eq!(session.tool(), ToolState::Up);
}

#[test]
fn test_dry_run_writes_transcript_only() {
    let transcript = SharedBuf::default();
    let mut session = CutterSession::new(
        DeviceProfile::dummy(),
        None,
        SessionOptions {
            dry_run: true,
            ..SessionOptions::default()
        },
    )
    .with_transcript(Box::new(transcript.clone()));

    assert!(session.left_aligned());
    assert_eq!(session.status().unwrap(), DeviceStatus::Ready);

    let (output, delivery) = session.plot(&letter_y_stem()).unwrap();
    assert_eq!(delivery.sent, output.commands.len() + output.trailer.len());
    assert_eq!(transcript.lines().last().map(String::as_str), Some("G01Y00F10"));
    assert_eq!(transcript.lines().len(), delivery.sent);
}

#[test]
fn test_missing_transport_is_an_error_outside_dry_run() {
    let mut session = CutterSession::new(DeviceProfile::dummy(), None, SessionOptions::default());
    let err = session.plot(&letter_y_stem()).unwrap_err();
    assert!(err.is_connection_error());
    assert!(!err.is_timeout());
}

#[test]
fn test_timeouts_are_tolerated_and_flagged() {
    let transport = ScriptedTransport::with_script(vec![
        Reply::Line("ok"),
        Reply::ReadTimeout,
        Reply::WriteTimeout,
        Reply::Line("ok"),
    ]);
    let progress = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&progress);
    let mut session = connected(&transport).with_progress(Box::new(move |done, total, flags| {
        seen.lock().unwrap().push((done, total, flags.to_string()));
    }));

    let (output, delivery) = session.plot(&letter_y_stem()).unwrap();
    assert_eq!(delivery.timeouts, 2);
    assert_eq!(delivery.sent, output.commands.len() + 2);

    let progress = progress.lock().unwrap();
    assert_eq!(progress[0], (1, 4, String::new()));
    assert_eq!(progress[1], (2, 4, "t".to_string()));
    assert_eq!(progress[2], (3, 4, "tt".to_string()));
    assert_eq!(progress[3], (4, 4, String::new()));
    // the write that timed out never reached the wire
    assert_eq!(transport.written().len(), delivery.sent - 1);
}

#[test]
fn test_other_transport_errors_abort() {
    let transport = ScriptedTransport::with_script(vec![Reply::Line("ok"), Reply::Unplugged]);
    let mut session = connected(&transport);

    let err = session.plot(&letter_y_stem()).unwrap_err();
    assert!(err.is_connection_error());
    assert_eq!(transport.written().len(), 2);
    assert_eq!(session.tool(), ToolState::Down);
}

#[test]
fn test_job_after_abort_raises_tool_first() {
    let transport = ScriptedTransport::with_script(vec![Reply::Line("ok"), Reply::Unplugged]);
    let mut session = connected(&transport);
    assert!(session.plot(&letter_y_stem()).is_err());

    session.plot(&letter_y_stem()).unwrap();
    let written = transport.written();
    assert_eq!(written[2], "G01Z0F10\n");
    assert_eq!(written[3], "G01X0.000000Y0.000000F10\n");
    assert_eq!(session.tool(), ToolState::Up);
}

#[test]
fn test_setup_selects_tool_and_homes() {
    let transport = ScriptedTransport::default();
    let mut session = connected(&transport);

    let tool = session
        .setup(SetupOptions {
            media: 113,
            toolholder: 2,
            sw_clipping: false,
            clip_fuzz: 0.1,
            left_aligned: Some(false),
            ..SetupOptions::default()
        })
        .unwrap();

    assert_eq!(transport.written(), ["T2\n", "$H\n"]);
    assert!(tool.pen);
    assert_eq!(tool.media_name, Some("Pen"));
    assert_eq!(tool.pressure, Some(18));
    assert!(!session.left_aligned());
    assert!(!session.clip_settings().enabled);
    assert_eq!(session.clip_settings().fuzz, 0.1);
    assert_eq!(session.tool(), ToolState::Up);
}

#[test]
fn test_setup_defaults_and_custom_media() {
    let mut session = connected(&ScriptedTransport::default());

    let tool = session.setup(SetupOptions::default()).unwrap();
    assert_eq!(tool.media, 132);
    assert_eq!((tool.pressure, tool.speed, tool.depth), (Some(5), Some(10), Some(1)));
    assert!(!tool.pen);

    let tool = session
        .setup(SetupOptions {
            media: 42,
            speed: Some(3),
            ..SetupOptions::default()
        })
        .unwrap();
    assert_eq!(tool.media, 300);
    assert_eq!(tool.speed, Some(3));
    assert_eq!(tool.pressure, None);
}

#[test]
fn test_left_alignment_without_override() {
    let session = connected(&ScriptedTransport::default());
    assert!(session.left_aligned());

    let mut narrow = DeviceProfile::dummy();
    narrow.name = "No width".to_string();
    let session = CutterSession::new(
        narrow,
        Some(Box::new(ScriptedTransport::default())),
        SessionOptions::default(),
    );
    assert!(!session.left_aligned());
}

#[test]
fn test_status_and_wait_for_ready() {
    let transport = ScriptedTransport::with_script(vec![
        Reply::Line("<Door:0|MPos:0.000,0.000,0.000>"),
        Reply::Line("<Run|MPos:1.000,0.000,0.000>"),
        Reply::Line("<Idle|MPos:0.000,0.000,0.000>"),
    ]);
    let mut session = connected(&transport);

    let state = session
        .wait_for_ready(Duration::from_millis(50), Duration::from_millis(1))
        .unwrap();
    assert_eq!(state, DeviceStatus::Ready);
    assert_eq!(transport.written(), ["?", "?", "?"]);
}

#[test]
fn test_wait_for_ready_gives_up() {
    let transport = ScriptedTransport::with_script(vec![
        Reply::Line("<Run>"),
        Reply::Line("<Run>"),
        Reply::Line("<Run>"),
    ]);
    let mut session = connected(&transport);

    let state = session
        .wait_for_ready(Duration::from_millis(3), Duration::from_millis(1))
        .unwrap();
    assert_eq!(state, DeviceStatus::Moving);
}

#[test]
fn test_queries_in_transcript_only_when_asked() {
    let transcript = SharedBuf::default();
    let transport = ScriptedTransport::with_script(vec![Reply::Line("<Idle>")]);
    let mut session = CutterSession::new(
        DeviceProfile::cricut_maker1(),
        Some(Box::new(transport)),
        SessionOptions {
            inc_queries: true,
            ..SessionOptions::default()
        },
    )
    .with_transcript(Box::new(transcript.clone()));

    session.status().unwrap();
    assert_eq!(transcript.lines(), ["?"]);
}

#[test]
fn test_move_origin() {
    let transport = ScriptedTransport::with_script(vec![
        Reply::Line("<Idle>"),
        Reply::Line("ok"),
        Reply::Line("ok"),
        Reply::Line("<Idle>"),
    ]);
    let mut session = connected(&transport);

    let delivery = session.move_origin(50).unwrap();
    assert_eq!(delivery.sent, 2);
    assert_eq!(transport.written(), ["?", "G10L02P0Y50\n", "G01Y0\n", "?"]);
    assert_eq!(session.version(), "CutcutGo v1.0");
}

#[test]
fn test_outline_job_over_session() {
    let transport = ScriptedTransport::default();
    let mut session = connected(&transport);

    let request = letter_y_stem().with_mode(PlotMode::Outline);
    let (output, _) = session.plot(&request).unwrap();
    assert_eq!(output.commands.iter().filter(|t| t.is_motion()).count(), 5);
    assert_eq!(transport.written().len(), output.commands.len() + 2);
    session.close().unwrap();
}
