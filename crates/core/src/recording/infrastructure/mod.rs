pub mod background_clip_recorder;
pub mod image_sequence_clip_writer;
