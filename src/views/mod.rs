pub mod course;
pub mod home;

pub use course::CourseView;
