#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{DiffError, LineType, Segment, parse_diff};

    #[test]
    fn test_parse_diff() {
        let sample_diff = r#"diff --git a/test.txt b/test.txt
index 1234567..abcdefg 100644
--- a/test.txt
+++ b/test.txt
@@ -1,5 +1,6 @@
-This is the original file.
+This is the MODIFIED file.
 It has multiple lines.
-Some content here.
+Some NEW content here.
 More content.
+Additional line added.
 Final line."#;

        let result = parse_diff(sample_diff).unwrap();

        assert_eq!(result.file_count(), 1);
        let file = &result.files[0];
        assert_eq!(file.get_name(), "test.txt");
        assert_eq!(file.get_status(), 'M');
        assert_eq!((file.add_count, file.del_count), (3, 2));
        assert_eq!(file.left_lines.len(), file.right_lines.len());
        assert_eq!(file.row_count(), 6);

        let left: Vec<LineType> = file.left_lines.iter().map(|l| l.line_type).collect();
        let right: Vec<LineType> = file.right_lines.iter().map(|l| l.line_type).collect();
        assert_eq!(
            left,
            vec![
                LineType::Removed,
                LineType::Context,
                LineType::Removed,
                LineType::Context,
                LineType::Placeholder,
                LineType::Context,
            ]
        );
        assert_eq!(
            right,
            vec![
                LineType::Added,
                LineType::Context,
                LineType::Added,
                LineType::Context,
                LineType::Added,
                LineType::Context,
            ]
        );

        assert_eq!(
            file.right_lines[0].segments,
            vec![
                Segment::new("This is the ", false),
                Segment::new("MODIFIED", true),
                Segment::new(" file.", false),
            ]
        );
        assert_eq!(
            file.right_lines[2].segments,
            vec![
                Segment::new("Some ", false),
                Segment::new("NEW ", true),
                Segment::new("content here.", false),
            ]
        );
        assert!(file.right_lines[4].segments.is_empty());
    }

    #[test]
    fn test_scenario_single_modification() {
        let input = "diff --git a/f.txt b/f.txt\n--- a/f.txt\n+++ b/f.txt\n@@ -1 +1 @@\n-old\n+new\n";
        let file = &parse_diff(input).unwrap().files[0];

        assert_eq!(file.row_count(), 1);
        assert_eq!(file.left_lines[0].line_type, LineType::Removed);
        assert_eq!(file.left_lines[0].content, "old");
        assert_eq!(file.right_lines[0].line_type, LineType::Added);
        assert_eq!(file.right_lines[0].content, "new");
        assert_eq!(file.left_lines[0].segments, vec![Segment::new("old", true)]);
        assert_eq!(file.right_lines[0].segments, vec![Segment::new("new", true)]);
    }

    #[test]
    fn test_scenario_three_deletes_one_add() {
        let input = "diff --git a/f b/f\n--- a/f\n+++ b/f\n@@ -1,3 +1 @@\n-a\n-b\n-c\n+d\n";
        let file = &parse_diff(input).unwrap().files[0];

        assert_eq!(file.row_count(), 3);
        assert_eq!(file.left_lines[0].line_type, LineType::Removed);
        assert_eq!(file.right_lines[0].line_type, LineType::Added);
        for row in 1..3 {
            assert_eq!(file.left_lines[row].line_type, LineType::Removed);
            assert_eq!(file.right_lines[row].line_type, LineType::Placeholder);
        }
    }

    #[test]
    fn test_scenario_one_delete_three_adds() {
        let input = "diff --git a/f b/f\n--- a/f\n+++ b/f\n@@ -1 +1,3 @@\n-a\n+b\n+c\n+d\n";
        let file = &parse_diff(input).unwrap().files[0];

        assert_eq!(file.row_count(), 3);
        assert_eq!(file.left_lines[0].line_type, LineType::Removed);
        assert_eq!(file.right_lines[0].line_type, LineType::Added);
        for row in 1..3 {
            assert_eq!(file.left_lines[row].line_type, LineType::Placeholder);
            assert_eq!(file.right_lines[row].line_type, LineType::Added);
        }
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse_diff(""), Err(DiffError::EmptyDiff));
        assert_eq!(parse_diff("  \n\t\n"), Err(DiffError::EmptyDiff));
        assert_eq!(parse_diff("just some text\n"), Err(DiffError::EmptyDiff));
    }

    #[test]
    fn test_new_file() {
        let input = r#"diff --git a/utils.go b/utils.go
new file mode 100644
--- /dev/null
+++ b/utils.go
@@ -0,0 +1,5 @@
+package main
+
+func add(a, b int) int {
+    return a + b
+}
"#;
        let file = &parse_diff(input).unwrap().files[0];

        assert!(file.is_new);
        assert!(!file.is_deleted);
        assert_eq!(file.get_status(), 'A');
        assert_eq!((file.add_count, file.del_count), (5, 0));
        assert!(file.left_lines.iter().all(|l| l.is_placeholder()));
        assert_eq!(file.right_lines[1].content, "");
    }

    #[test]
    fn test_deleted_file_uses_old_path_as_name() {
        let input = r#"diff --git a/old.go b/old.go
deleted file mode 100644
--- a/old.go
+++ /dev/null
@@ -1,3 +0,0 @@
-package main
-
-func deprecated() {}
"#;
        let file = &parse_diff(input).unwrap().files[0];

        assert!(file.is_deleted);
        assert_eq!(file.get_name(), "old.go");
        assert_eq!((file.add_count, file.del_count), (0, 3));
        assert!(file.right_lines.iter().all(|l| l.is_placeholder()));
    }

    #[test]
    fn test_binary_file_has_no_rows() {
        let input = r#"diff --git a/logo.png b/logo.png
index 1111111..2222222 100644
Binary files a/logo.png and b/logo.png differ
diff --git a/readme.md b/readme.md
--- a/readme.md
+++ b/readme.md
@@ -1 +1 @@
-Hello
+Hello world
"#;
        let result = parse_diff(input).unwrap();

        assert_eq!(result.file_count(), 2);
        let binary = &result.files[0];
        assert!(binary.is_binary);
        assert_eq!(binary.get_status(), 'B');
        assert!(binary.left_lines.is_empty());
        assert!(binary.right_lines.is_empty());

        let text = &result.files[1];
        assert_eq!(
            text.right_lines[0].segments,
            vec![Segment::new("Hello", false), Segment::new(" world", true)]
        );
    }

    #[test]
    fn test_rename_with_changes() {
        let input = r#"diff --git a/src/old_name.rs b/src/new_name.rs
similarity index 90%
rename from src/old_name.rs
rename to src/new_name.rs
index 3333333..4444444 100644
--- a/src/old_name.rs
+++ b/src/new_name.rs
@@ -1,2 +1,2 @@
 fn main() {
-    run(1);
+    run(2);
"#;
        let file = &parse_diff(input).unwrap().files[0];

        assert_eq!(file.old_path, "src/old_name.rs");
        assert_eq!(file.new_path, "src/new_name.rs");
        assert_eq!(file.get_name(), "src/new_name.rs");
        assert_eq!(file.get_status(), 'R');
        assert_eq!(file.row_count(), 2);
    }

    #[test]
    fn test_multiple_files_keep_input_order() {
        let input = r#"diff --git a/main.go b/main.go
index 1234567..abcdef0 100644
--- a/main.go
+++ b/main.go
@@ -1,5 +1,6 @@
 package main

 func main() {
-    println("hello")
+    println("hello world")
+    println("new line")
 }
diff --git a/utils.go b/utils.go
new file mode 100644
--- /dev/null
+++ b/utils.go
@@ -0,0 +1,2 @@
+package main
+
"#;
        let result = parse_diff(input).unwrap();

        assert_eq!(result.file_count(), 2);
        assert_eq!(result.files[0].get_name(), "main.go");
        assert!(!result.files[0].is_new);
        assert_eq!((result.files[0].add_count, result.files[0].del_count), (2, 1));
        assert_eq!(result.files[0].row_count(), 6);
        assert_eq!(result.files[1].get_name(), "utils.go");
        assert!(result.files[1].is_new);
        assert_eq!(result.total_stats().additions, 4);
    }

    #[test]
    fn test_multiple_hunks_record_offsets() {
        let input = r#"diff --git a/lib.rs b/lib.rs
--- a/lib.rs
+++ b/lib.rs
@@ -1,2 +1,2 @@
 use std::io;
-use std::fs;
@@ -10,2 +9,3 @@ fn run() {
+    setup();
     work();
 }
"#;
        let file = &parse_diff(input).unwrap().files[0];

        assert_eq!(file.hunk_offsets, vec![0, 2]);
        assert_eq!(file.row_count(), 5);
        assert_eq!(file.right_lines[2].new_line_num, Some(9));
        assert_eq!(file.left_lines[3].old_line_num, Some(10));
    }

    #[test]
    fn test_malformed_hunk_discards_everything() {
        let input = "diff --git a/a b/a\n--- a/a\n+++ b/a\n@@ -1 +1 @@\n-x\n+y\ndiff --git a/b b/b\n--- a/b\n+++ b/b\n@@ -1 +oops @@\n";
        assert!(matches!(
            parse_diff(input),
            Err(DiffError::MalformedHunk { line: 10, .. })
        ));
    }

    #[test]
    fn test_section_without_path_lines_has_no_rows() {
        let input = r#"diff --git a/run.sh b/run.sh
old mode 100644
new mode 100755
@@ -1 +1 @@
-echo a
+echo b
diff --git a/cfg.toml b/cfg.toml
old mode 100644
@@ bogus @@
diff --git a/lib.rs b/lib.rs
--- a/lib.rs
+++ b/lib.rs
@@ -1 +1 @@
-a
+b
"#;
        let result = parse_diff(input).unwrap();

        assert_eq!(result.file_count(), 3);
        assert_eq!(result.files[0].get_name(), "run.sh");
        assert_eq!(result.files[0].row_count(), 0);
        assert_eq!(result.files[0].stats().to_string(), "+0 -0");
        assert_eq!(result.files[1].get_name(), "cfg.toml");
        assert_eq!(result.files[1].row_count(), 0);
        assert_eq!(result.files[2].row_count(), 1);
    }
}
