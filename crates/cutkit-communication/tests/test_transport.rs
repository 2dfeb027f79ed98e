//! The transport trait is object safe and drives a scripted link

use cutkit_communication::{DeviceStatus, Transport, STATUS_QUERY};
use cutkit_core::{ConnectionError, Result};
use std::collections::VecDeque;
use std::time::Duration;

struct ScriptedLink {
    written: Vec<u8>,
    replies: VecDeque<Result<String>>,
}

impl Transport for ScriptedLink {
    fn write(&mut self, data: &[u8], _timeout: Duration) -> Result<usize> {
        self.written.extend_from_slice(data);
        Ok(data.len())
    }

    fn read_line(&mut self, timeout: Duration) -> Result<String> {
        self.replies.pop_front().unwrap_or_else(|| {
            Err(ConnectionError::ReadTimeout {
                timeout_ms: timeout.as_millis() as u64,
            }
            .into())
        })
    }

    fn name(&self) -> String {
        "scripted".to_string()
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

#[test]
fn test_status_query_over_boxed_transport() {
    let mut link: Box<dyn Transport> = Box::new(ScriptedLink {
        written: Vec::new(),
        replies: VecDeque::from([Ok("<Door:0|MPos:0,0,0>".to_string())]),
    });

    link.write(STATUS_QUERY.as_bytes(), Duration::from_millis(10)).unwrap();
    let status = DeviceStatus::parse_report(&link.read_line(Duration::from_millis(10)).unwrap());
    assert_eq!(status, DeviceStatus::Unloaded);

    let err = link.read_line(Duration::from_millis(10)).unwrap_err();
    assert!(err.is_timeout());
    assert_eq!(link.name(), "scripted");
}
