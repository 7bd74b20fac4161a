pub mod collision {
    pub mod domain {
        pub mod collision_classifier;
        pub mod collision_detector;
        pub mod collision_notifier;
        pub mod collision_thresholds;
        pub mod confirmation_debouncer;
        pub mod face_summary;
        pub mod frame_verdict;
    }
    pub mod infrastructure;
}

pub mod detection {
    pub mod domain {
        pub mod face_landmarks;
        pub mod face_mesh_detector;
    }
    pub mod infrastructure;
}

pub mod impact {
    pub mod domain {
        pub mod impact_event;
        pub mod impact_monitor;
        pub mod impact_thresholds;
        pub mod sensor_reading;
    }
    pub mod infrastructure;
}

pub mod pipeline {
    pub mod frame_schedule;
    pub mod monitor_collisions_use_case;
    pub mod session_logger;
}

pub mod pose {
    pub mod domain {
        pub mod head_pose;
        pub mod head_pose_tracker;
        pub mod pnp_solver;
        pub mod pose_thresholds;
    }
}

pub mod recording {
    pub mod domain {
        pub mod clip_recorder;
        pub mod clip_writer;
        pub mod frame_prebuffer;
    }
    pub mod infrastructure;
}

pub mod shared {
    pub mod bounding_box;
    pub mod constants;
    pub mod frame;
    pub mod settings;
    pub mod stream_metadata;
}

pub mod video {
    pub mod domain {
        pub mod frame_reader;
    }
    pub mod infrastructure;
}
