//! Single-producer / N-consumer parsing pipeline, grounded on the
//! `std::mutex` + `std::condition_variable` + `std::queue` pipeline in
//! `examples/original_source/src/parser/leda_rpt.cpp` and
//! `def_parser.cpp`.

use std::collections::VecDeque;
use std::io::BufRead;
use std::path::Path;

use parking_lot::{Condvar, Mutex};

use crate::error::{Error, Result};
use crate::model::{Db, Net, Pin, RiseFall};

use super::dialect::{Dialect, ParsedPathRaw, PathEntry};
use super::stream;

struct SharedQueue {
    blocks: Mutex<VecDeque<Vec<String>>>,
    not_empty: Condvar,
    done: Mutex<bool>,
}

impl SharedQueue {
    fn new() -> Self {
        SharedQueue {
            blocks: Mutex::new(VecDeque::new()),
            not_empty: Condvar::new(),
            done: Mutex::new(false),
        }
    }

    fn push(&self, block: Vec<String>) {
        self.blocks.lock().push_back(block);
        self.not_empty.notify_one();
    }

    fn mark_done(&self) {
        *self.done.lock() = true;
        self.not_empty.notify_all();
    }

    fn pop(&self) -> Option<Vec<String>> {
        let mut guard = self.blocks.lock();
        loop {
            if let Some(block) = guard.pop_front() {
                return Some(block);
            }
            if *self.done.lock() {
                return None;
            }
            self.not_empty.wait(&mut guard);
        }
    }
}

/// Parses a report file at `path` using `dialect`, with `num_consumers`
/// decode workers draining a shared, mutex-guarded block queue fed by a
/// single producer thread that walks the decoded stream line by line.
pub fn parse_report(path: impl AsRef<Path>, dialect: &dyn Dialect, num_consumers: usize) -> Result<Db> {
    let num_consumers = num_consumers.max(1);
    let reader = stream::open_report(path)?;
    let queue = SharedQueue::new();
    let io_error: Mutex<Option<std::io::Error>> = Mutex::new(None);
    let results: Mutex<Vec<ParsedPathRaw>> = Mutex::new(Vec::new());

    std::thread::scope(|scope| {
        scope.spawn(|| produce(reader, dialect, &queue, &io_error));
        for _ in 0..num_consumers {
            scope.spawn(|| consume(dialect, &queue, &results));
        }
    });

    if let Some(err) = io_error.into_inner() {
        return Err(Error::Io(err));
    }

    let mut results = results.into_inner();
    results.sort_by(|a, b| {
        a.startpoint
            .cmp(&b.startpoint)
            .then_with(|| a.endpoint.cmp(&b.endpoint))
            .then_with(|| a.slack.total_cmp(&b.slack))
    });

    let mut db = Db::new();
    for parsed in results {
        ingest_path(&mut db, parsed);
    }
    db.finalize();
    Ok(db)
}

fn produce(
    mut reader: Box<dyn BufRead + Send>,
    dialect: &dyn Dialect,
    queue: &SharedQueue,
    io_error: &Mutex<Option<std::io::Error>>,
) {
    let mut current: Vec<String> = Vec::new();
    let mut line = String::new();
    loop {
        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {
                let text = line.trim_end_matches(['\n', '\r']).to_string();
                if dialect.is_block_start(&text) && !current.is_empty() {
                    queue.push(std::mem::take(&mut current));
                }
                current.push(text);
            }
            Err(e) => {
                *io_error.lock() = Some(e);
                break;
            }
        }
    }
    if !current.is_empty() {
        queue.push(current);
    }
    queue.mark_done();
}

fn consume(dialect: &dyn Dialect, queue: &SharedQueue, results: &Mutex<Vec<ParsedPathRaw>>) {
    while let Some(block) = queue.pop() {
        match dialect.decode_block(&block) {
            Some(parsed) => results.lock().push(parsed),
            None => {
                tracing::warn!("dropped a path block that never reached a terminal state");
            }
        }
    }
}

/// Interns pins, links nets, and appends the resulting `Path` into `db`.
/// Pin rows alternate output/input starting at output, independent of
/// interleaved net rows (SPEC_FULL.md §3's Path invariant).
fn ingest_path(db: &mut Db, parsed: ParsedPathRaw) {
    let mut pin_ids = Vec::with_capacity(parsed.entries.len());
    let mut pin_position = 0usize;
    let mut last_driver: Option<crate::model::PinId> = None;
    let mut pending_net: Option<super::dialect::ParsedNet> = None;

    for entry in parsed.entries {
        match entry {
            PathEntry::Pin(p) => {
                let is_input = pin_position % 2 == 1;
                pin_position += 1;
                let rise_fall = if p.rise { RiseFall::Rise } else { RiseFall::Fall };
                let name = p.name.clone();
                let cell = p.cell.clone();
                let location = p.location;
                let trans = p.trans;
                let incr_delay = p.incr_delay;
                let path_delay = p.path_delay;
                let id = db.intern_pin(&name, move || {
                    let mut pin = Pin::new(name, is_input, rise_fall);
                    pin.cell = cell;
                    pin.location = location;
                    pin.trans = trans;
                    pin.incr_delay = incr_delay;
                    pin.path_delay = path_delay;
                    pin
                });

                if let Some(net) = pending_net.take() {
                    if let Some(driver_id) = last_driver {
                        let net_id = db.add_net(Net {
                            name: net.name,
                            fanout: net.fanout,
                            cap: net.cap,
                            driver: driver_id,
                            sink: id,
                        });
                        db.pin_mut(driver_id).net = Some(net_id);
                        db.pin_mut(id).net = Some(net_id);
                    } else {
                        tracing::warn!("net row with no bound driver pin, ignoring");
                    }
                }
                if !is_input {
                    last_driver = Some(id);
                }
                pin_ids.push(id);
            }
            PathEntry::Net(n) => {
                if pending_net.is_some() {
                    tracing::warn!(
                        net = n.name,
                        "net row observed before the previous net was bound to a sink pin, skipping"
                    );
                    continue;
                }
                pending_net = Some(n);
            }
        }
    }

    db.add_path(crate::model::Path {
        startpoint: parsed.startpoint,
        endpoint: parsed.endpoint,
        group: parsed.group,
        path_type: parsed.path_type,
        clock: parsed.clock,
        slack: parsed.slack,
        pins: pin_ids,
    });
}
