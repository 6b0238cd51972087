use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

use rayon::prelude::*;

use crate::dataset::manifest::{SourceFile, SourceManifest};
use crate::dataset::progress::{emit, AssembleEvent, ProgressSender};
use crate::dataset::result::{DatasetResult, FileReport, FrequencyTable, OutputSample, PixelStats};
use crate::decode::record::decode_record;
use crate::error::{Error, Result};
use crate::raster::canvas::Canvas;
use crate::raster::expand::{expand_nibbles, Polarity};
use crate::raster::matrix::GrayMatrix;
use crate::schema::{RecordSchema, SchemaFamily};

/// What to do when a source file fails with a recoverable format error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Fail the whole run on the first bad file.
    Abort,
    /// Drop the bad file, keep every other file's output, and record the
    /// failure in the file reports.
    SkipFile,
}

/// Configuration for an assembly run.
///
/// # Fields
/// - `target_width`, `target_height`: output size shared by all schemas
/// - `polarity`: gray ramp orientation for expanded pixels
/// - `on_error`: per-file handling of recoverable format errors
/// - `progress`: optional channel sender; per-file and per-record
///                   [`AssembleEvent`]s are sent while decoding runs. A
///                   dropped receiver mutes the stream without affecting
///                   the run.
#[derive(Debug, Clone)]
pub struct AssembleConfig {
    pub target_width: u32,
    pub target_height: u32,
    pub polarity: Polarity,
    pub on_error: ErrorPolicy,
    pub progress: Option<ProgressSender>,
}

impl AssembleConfig {
    /// Creates a minimal config: white background, abort on the first bad
    /// file, no observer.
    pub fn new(target_width: u32, target_height: u32) -> AssembleConfig {
        AssembleConfig {
            target_width,
            target_height,
            polarity: Polarity::WhiteBackground,
            on_error: ErrorPolicy::Abort,
            progress: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.target_width == 0 || self.target_height == 0 {
            return Err(Error::TargetSize {
                width: self.target_width,
                height: self.target_height,
            });
        }
        Ok(())
    }
}

/// Output of one fully decoded source file, merged into the dataset in
/// manifest order regardless of completion order.
struct FileSlice {
    images: Vec<GrayMatrix>,
    labels: Vec<String>,
    frequencies: FrequencyTable,
    stats: PixelStats,
}

/// Drives the decode pipeline across an ordered collection of source
/// files, producing the output tensor, label sequence, and frequency
/// table.
///
/// Construction validates the schema and the config; everything that can
/// fail as configuration fails here, before any file is opened.
#[derive(Debug)]
pub struct DatasetAssembler {
    schema: RecordSchema,
    config: AssembleConfig,
}

impl DatasetAssembler {
    pub fn new(schema: RecordSchema, config: AssembleConfig) -> Result<DatasetAssembler> {
        schema.validate()?;
        config.validate()?;
        Ok(DatasetAssembler { schema, config })
    }

    /// Assembler for one of the three documented schema families.
    pub fn from_family(family: SchemaFamily, config: AssembleConfig) -> Result<DatasetAssembler> {
        DatasetAssembler::new(family.schema(), config)
    }

    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }

    /// Decodes every file of the manifest in order.
    ///
    /// Files are read one bounded record at a time, never loaded whole.
    /// After the last file, `consistent` reports whether the number of
    /// decoded records matches the declared sum; a shortfall is an audit
    /// signal in the result, not an error.
    pub fn assemble(&self, manifest: &SourceManifest) -> Result<DatasetResult> {
        let outcomes = manifest
            .files
            .iter()
            .enumerate()
            .map(|(index, source)| (index, source, self.run_file(index, source)));
        self.merge_outcomes(manifest.total_records(), outcomes)
    }

    /// Like [`assemble`](Self::assemble), with one worker task per file.
    ///
    /// Each task owns its canvas and produces an independent slice;
    /// slices are concatenated in manifest order and frequency tables
    /// merged by summation, so the result is identical to the sequential
    /// path.
    pub fn assemble_parallel(&self, manifest: &SourceManifest) -> Result<DatasetResult> {
        let outcomes: Vec<_> = manifest
            .files
            .par_iter()
            .enumerate()
            .map(|(index, source)| (index, source, self.run_file(index, source)))
            .collect();
        self.merge_outcomes(manifest.total_records(), outcomes)
    }

    /// Random access to a single record: decodes record `index` of `path`
    /// through the full pipeline without touching the records before it.
    pub fn decode_one(&self, path: impl AsRef<Path>, index: usize) -> Result<OutputSample> {
        let path = path.as_ref();
        let mut file = File::open(path)?;
        let mut buf = vec![0u8; self.schema.record_byte_size];
        self.fill_record(&mut file, &mut buf, path, index)?;
        let mut canvas = Canvas::for_schema(&self.schema);
        let (sample, _) = self.process_record(&buf, &mut canvas)?;
        Ok(sample)
    }

    fn run_file(&self, file_index: usize, source: &SourceFile) -> Result<FileSlice> {
        emit(&self.config.progress, AssembleEvent::FileStarted {
            file_index,
            path: source.path.clone(),
            declared: source.records,
        });
        let slice = self.assemble_file(file_index, source)?;
        emit(&self.config.progress, AssembleEvent::FileFinished {
            file_index,
            path: source.path.clone(),
            decoded: slice.images.len(),
            min_pixel: slice.stats.min,
            max_pixel: slice.stats.max,
        });
        Ok(slice)
    }

    fn assemble_file(&self, file_index: usize, source: &SourceFile) -> Result<FileSlice> {
        let mut file = File::open(&source.path)?;
        let mut canvas = Canvas::for_schema(&self.schema);
        let mut buf = vec![0u8; self.schema.record_byte_size];
        let mut slice = FileSlice {
            images: Vec::with_capacity(source.records),
            labels: Vec::with_capacity(source.records),
            frequencies: FrequencyTable::new(),
            stats: PixelStats::default(),
        };

        for record_index in 0..source.records {
            self.fill_record(&mut file, &mut buf, &source.path, record_index)?;
            let (sample, (lo, hi)) = self.process_record(&buf, &mut canvas)?;
            slice.stats.update(lo, hi);
            slice.frequencies.increment(&sample.label);
            emit(&self.config.progress, AssembleEvent::RecordDecoded {
                file_index,
                record_index,
                label: sample.label.clone(),
                serial_id: sample.serial_id,
            });
            slice.labels.push(sample.label);
            slice.images.push(sample.pixels);
        }
        Ok(slice)
    }

    /// Reads record `index` into `buf` at its absolute offset. A short
    /// read means the file is truncated relative to its declared count.
    fn fill_record(&self, file: &mut File, buf: &mut [u8], path: &Path, index: usize) -> Result<()> {
        let offset = (index * self.schema.record_byte_size) as u64;
        file.seek(SeekFrom::Start(offset))?;
        file.read_exact(buf).map_err(|err| {
            if err.kind() == ErrorKind::UnexpectedEof {
                Error::TruncatedRecord {
                    path: path.to_path_buf(),
                    index,
                    expected: self.schema.record_byte_size,
                }
            } else {
                Error::Io(err)
            }
        })
    }

    /// One record through the pipeline: decode, expand, composite, resize,
    /// label. Returns the sample plus the expanded image's (min, max) for
    /// the running diagnostics.
    fn process_record(&self, bytes: &[u8], canvas: &mut Canvas) -> Result<(OutputSample, (u8, u8))> {
        let record = decode_record(bytes, &self.schema)?;
        let native = expand_nibbles(
            &record.nibbles,
            self.schema.pixel_width,
            self.schema.pixel_height,
            self.config.polarity,
        )?;
        let range = native.min_max();

        canvas.reset();
        let (x, y) = self.schema.paste_offset;
        canvas.paste(&native, x, y)?;
        let pixels = canvas.resize(self.config.target_width, self.config.target_height)?;

        let label = record.label(&self.schema)?;
        let serial_id = record.serial(&self.schema)?;
        Ok((OutputSample { pixels, label, serial_id }, range))
    }

    fn merge_outcomes<'a, I>(&self, declared_total: usize, outcomes: I) -> Result<DatasetResult>
    where
        I: IntoIterator<Item = (usize, &'a SourceFile, Result<FileSlice>)>,
    {
        let mut result = DatasetResult {
            tensor: Vec::new(),
            labels: Vec::new(),
            frequencies: FrequencyTable::new(),
            consistent: false,
            pixel_stats: PixelStats::default(),
            file_reports: Vec::new(),
        };

        for (file_index, source, outcome) in outcomes {
            match outcome {
                Ok(slice) => {
                    result.file_reports.push(FileReport {
                        path: source.path.clone(),
                        declared: source.records,
                        decoded: slice.images.len(),
                        error: None,
                    });
                    result.pixel_stats.merge(slice.stats);
                    result.frequencies.merge(slice.frequencies);
                    result.labels.extend(slice.labels);
                    result.tensor.extend(slice.images);
                }
                Err(err) if self.config.on_error == ErrorPolicy::SkipFile && err.is_recoverable() => {
                    emit(&self.config.progress, AssembleEvent::FileFailed {
                        file_index,
                        path: source.path.clone(),
                        error: err.to_string(),
                    });
                    result.file_reports.push(FileReport {
                        path: source.path.clone(),
                        declared: source.records,
                        decoded: 0,
                        error: Some(err.to_string()),
                    });
                }
                Err(err) => return Err(err),
            }
        }

        result.consistent = result.tensor.len() == declared_total;
        Ok(result)
    }
}
