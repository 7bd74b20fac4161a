pub mod sensor_log;
