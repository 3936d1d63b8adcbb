// In-memory stand-in for a serial port.
use super::TimedPort;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::io::{self, ErrorKind, Read, Write};
use std::rc::Rc;
use std::time::Duration;

/// Plays back scripted reads and writes. An empty read script behaves like a
/// quiet line (`TimedOut`), an empty write script accepts everything.
#[derive(Default)]
pub struct FakePort {
    pub reads: VecDeque<io::Result<Vec<u8>>>,
    pub writes: VecDeque<io::Result<usize>>,
    pub written: Rc<RefCell<Vec<u8>>>,
    pub timeouts: Rc<RefCell<Vec<Duration>>>,
    pub drops: Rc<Cell<usize>>,
}

impl FakePort {
    pub fn new() -> FakePort {
        FakePort::default()
    }

    pub fn with_reads(reads: Vec<io::Result<Vec<u8>>>) -> FakePort {
        let mut port = FakePort::default();
        port.reads = reads.into();
        port
    }
}

impl Read for FakePort {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.reads.pop_front() {
            Some(Ok(mut bytes)) => {
                let n = bytes.len().min(buf.len());
                buf[..n].copy_from_slice(&bytes[..n]);
                if n < bytes.len() {
                    self.reads.push_front(Ok(bytes.split_off(n)));
                }
                Ok(n)
            }
            Some(Err(e)) => Err(e),
            None => Err(io::Error::new(ErrorKind::TimedOut, "quiet line")),
        }
    }
}

impl Write for FakePort {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = match self.writes.pop_front() {
            Some(Ok(n)) => n.min(buf.len()),
            Some(Err(e)) => return Err(e),
            None => buf.len(),
        };
        self.written.borrow_mut().extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl TimedPort for FakePort {
    fn set_io_timeout(&mut self, timeout: Duration) -> io::Result<()> {
        self.timeouts.borrow_mut().push(timeout);
        Ok(())
    }
}

impl Drop for FakePort {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}
