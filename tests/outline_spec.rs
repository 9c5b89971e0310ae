mod common;

use onenote_import::models::NodeKind;
use onenote_import::outline::*;
use speculate2::speculate;

speculate! {
    describe "parse_outline" {
        it "builds a course with sections and lessons" {
            let parsed = parse_outline(common::SAMPLE).expect("parse failed");
            let course = &parsed.course;

            assert_eq!(course.kind, NodeKind::Course);
            assert_eq!(course.title, "Rust Fundamentals");
            assert_eq!(course.children.len(), 2);

            let week1 = &course.children[0];
            assert_eq!(week1.kind, NodeKind::Section);
            assert_eq!(week1.index, "1");
            assert_eq!(week1.title, "Week 1");
            assert_eq!(week1.children.len(), 2);
            assert_eq!(week1.children[1].index, "1.2");
            assert_eq!(week1.children[1].title, "Borrowing");
            assert_eq!(week1.children[1].kind, NodeKind::Lesson);

            assert_eq!(course.lesson_count(), 3);
            assert!(parsed.warnings.is_empty());
        }

        it "fails without a course title" {
            let result = parse_outline("1. Week 1\n   1.1. Ownership\n");
            assert_eq!(result, Err(ParseError::NoCourseTitle));
        }

        it "fails on empty input" {
            assert_eq!(parse_outline(""), Err(ParseError::NoCourseTitle));
        }

        it "accepts a course title anywhere in the file" {
            let parsed = parse_outline("1. Intro\nCOURSE: Late Title\n").expect("parse failed");
            assert_eq!(parsed.course.title, "Late Title");
            assert_eq!(parsed.course.children.len(), 1);
        }

        it "accepts a file saved with a byte order mark" {
            let parsed = parse_outline("\u{FEFF}COURSE: X\n1. Week 1\n   1.1. A\n").expect("parse failed");
            assert_eq!(parsed.course.title, "X");
            assert_eq!(parsed.course.children[0].children[0].title, "A");
            assert!(parsed.warnings.is_empty());
        }

        it "is idempotent" {
            let first = parse_outline(common::SAMPLE).expect("parse failed");
            let second = parse_outline(common::SAMPLE).expect("parse failed");
            assert_eq!(first, second);
        }

        it "keeps file order even when numbering is out of order" {
            let text = "COURSE: X\n3. Third\n   3.2. B\n   3.1. A\n1. First\n2. Second\n";
            let parsed = parse_outline(text).expect("parse failed");

            let indices: Vec<&str> = parsed.course.children.iter().map(|s| s.index.as_str()).collect();
            assert_eq!(indices, vec!["3", "1", "2"]);

            let lessons: Vec<&str> = parsed.course.children[0].children.iter().map(|l| l.index.as_str()).collect();
            assert_eq!(lessons, vec!["3.2", "3.1"]);
        }

        it "skips banners and stray text" {
            let text = "COURSE: X\n=====\nSome intro paragraph.\n\n1. Week 1\n-----\n   1.1. A\n   notes about A\n";
            let parsed = parse_outline(text).expect("parse failed");
            assert_eq!(parsed.course.children.len(), 1);
            assert_eq!(parsed.course.children[0].children.len(), 1);
            assert!(parsed.warnings.is_empty());
        }

        it "drops an orphan lesson and parses the rest" {
            let text = "COURSE: X\n   1.1. Orphan\n1. Week 1\n   1.1. A\n";
            let parsed = parse_outline(text).expect("parse failed");

            assert_eq!(parsed.course.children.len(), 1);
            assert_eq!(parsed.course.children[0].children.len(), 1);
            assert_eq!(parsed.course.children[0].children[0].title, "A");
            assert_eq!(
                parsed.warnings,
                vec![ParseWarning {
                    line: 2,
                    reason: WarningReason::OrphanLesson { index: "1.1".to_string() },
                }]
            );
        }

        it "drops a lesson numbered for another section" {
            let text = "COURSE: X\n1. Week 1\n   2.1. Misplaced\n   1.1. A\n";
            let parsed = parse_outline(text).expect("parse failed");

            assert_eq!(parsed.course.children[0].children.len(), 1);
            assert!(matches!(
                parsed.warnings[0].reason,
                WarningReason::MismatchedLesson { .. }
            ));
        }

        it "keeps the first course title" {
            let text = "COURSE: First\nCOURSE: Second\n";
            let parsed = parse_outline(text).expect("parse failed");
            assert_eq!(parsed.course.title, "First");
            assert_eq!(parsed.warnings.len(), 1);
            assert_eq!(parsed.warnings[0].line, 2);
        }
    }

    describe "classify_line" {
        it "tags every line with exactly one kind" {
            assert!(matches!(classify_line("COURSE: X"), LineKind::CourseTitle("X")));
            assert!(matches!(classify_line("1. Week"), LineKind::SectionHeader { .. }));
            assert!(matches!(classify_line("  1.1. Lesson"), LineKind::LessonHeader { .. }));
            assert!(matches!(classify_line("####"), LineKind::Ignored));
        }
    }
}
