pub mod formatter;

pub use formatter::{
    format_class_table, format_course_list, format_grade_label, format_mandatory_status,
    format_summary, format_tsv, should_use_colors, terminal_width, ClassRow,
};
