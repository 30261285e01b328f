use log::LevelFilter;
use log4rs::{
    Config,
    append::{
        console::{ConsoleAppender, Target},
        rolling_file::{
            RollingFileAppender,
            policy::compound::{
                CompoundPolicy, roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger,
            },
        },
    },
    config::{Appender, Logger, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
};

const ROTATE_AT_BYTES: u64 = 10 * 1024 * 1024;
const ARCHIVED_FILES: u32 = 3;

const FILE_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} {l} {t} - {m}{n}";

/// Info and above to stderr, debug and above to a size-rotated log file.
pub fn init_logger() {
    let file_path = std::env::var("LOG_FILE_PATH").expect("LOG_FILE_PATH must be set");
    let archive_pattern =
        std::env::var("LOG_ARCHIVE_PATTERN").expect("LOG_ARCHIVE_PATTERN must be set");

    let roller = FixedWindowRoller::builder()
        .build(&archive_pattern, ARCHIVED_FILES)
        .expect("LOG_ARCHIVE_PATTERN must contain {}");
    let policy = CompoundPolicy::new(
        Box::new(SizeTrigger::new(ROTATE_AT_BYTES)),
        Box::new(roller),
    );
    let file = RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(FILE_PATTERN)))
        .build(&file_path, Box::new(policy))
        .expect("Failed to open log file");

    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{h({l})} {m}{n}")))
        .build();

    let config = Config::builder()
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file)),
        )
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Info)))
                .build("stderr", Box::new(stderr)),
        )
        // sqlx statement logs drown out everything else at debug
        .logger(Logger::builder().build("sqlx", LevelFilter::Warn))
        .build(
            Root::builder()
                .appender("file")
                .appender("stderr")
                .build(LevelFilter::Debug),
        )
        .expect("Invalid logger configuration");

    log4rs::init_config(config).expect("Failed to initialize logger");
}
