use std::time::Instant;

/// Monotonic milliseconds since the run started.
#[derive(Clone, Copy, Debug)]
pub struct Stopwatch {
    origin: Instant,
}

impl Stopwatch {
    pub fn start() -> Stopwatch {
        Stopwatch {
            origin: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

#[cfg(test)]
#[test]
fn test_elapsed_is_monotonic() {
    let clock = Stopwatch::start();
    let first = clock.elapsed_ms();
    std::thread::sleep(std::time::Duration::from_millis(5));
    let second = clock.elapsed_ms();
    assert!(second >= first + 5);
}
