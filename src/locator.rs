//! Locator engine: the single-threaded sample-cursor loop that ties
//! [`xcor`] and [`field`] together and hands each tick's likelihood image
//! to a [`field::FieldSink`].
//!
//! Mirrors the reference `view.c` timer callback (`update()`): advance
//! the cursor, run one correlation, accumulate the field, present it,
//! and stop once the cursor runs past the end of the input.

use crate::error::Error;
use crate::field::{self, DelayTable, FieldSink};
use crate::wave::Stream;
use crate::xcor::{Engine, Frame};
use crate::Real;

/// Owns the correlation engine and delay table and drives ticks over a
/// fixed set of input streams.
pub struct Locator<'a> {
    streams: Vec<&'a [Real]>,
    engine: Engine,
    table: DelayTable,
    frame: Frame,
    image: Vec<Real>,
    cursor: usize,
    n_samples: usize,
    l: usize,
}

impl<'a> Locator<'a> {
    pub fn new(inputs: &'a [Stream], table: DelayTable, l: usize, u: usize) -> Result<Self, Error> {
        let n = inputs.len();
        let n_samples = inputs.iter().map(Stream::len).min().unwrap_or(0);
        let streams: Vec<&[Real]> = inputs.iter().map(Stream::as_slice).collect();
        let engine = Engine::new(l, n, u)?;
        let frame = engine.new_frame();
        let image = vec![0.0; table.xres() * table.yres()];

        Ok(Self {
            streams,
            engine,
            table,
            frame,
            image,
            cursor: 0,
            n_samples,
            l,
        })
    }

    /// Run one tick: correlate at the current cursor, accumulate the
    /// field, present it to `sink`, and advance the cursor by one sample.
    ///
    /// Returns [`Error::OutOfRange`] once the cursor runs past
    /// `n_samples - L`; the caller treats this as normal termination.
    pub fn tick(&mut self, sink: &mut dyn FieldSink) -> Result<(), Error> {
        if self.cursor + self.l > self.n_samples {
            return Err(Error::OutOfRange);
        }

        self.engine.correlate(&self.streams, self.cursor, &mut self.frame);
        field::accumulate(&self.frame, &self.table, &mut self.image);
        sink.present(&self.image, self.table.xres(), self.table.yres());

        self.cursor += 1;
        Ok(())
    }
}

/// Drive `locator` to completion, calling `tick` until it reports
/// [`Error::OutOfRange`], which is not propagated.
pub fn run(locator: &mut Locator<'_>, sink: &mut dyn FieldSink) -> Result<(), Error> {
    loop {
        match locator.tick(sink) {
            Ok(()) => {}
            Err(Error::OutOfRange) => return Ok(()),
            Err(e) => return Err(e),
        }
    }
}
