mod common;
mod deploy_tests;
mod genin_tests;
mod rsync_tests;
