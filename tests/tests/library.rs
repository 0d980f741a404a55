//! Library catalog integration tests.
//!
//! Authors and books, people with subtypes, and a type that refuses some
//! operations.

use jolt_tests::prelude::*;

mod books {
    use super::*;

    fn options() -> AtomicOptions {
        AtomicOptions {
            max_operations_per_request: Some(3),
            ..AtomicOptions::default()
        }
    }

    pub fn scenario() -> Scenario {
        Scenario::new("books")
            .catalog(Catalog::Library)
            .options(options())
            .seed("library/seeds/minimal.ops")
            .operations("library/operations/books.ops")
            .step("author_then_book", |a| {
                a.ok()
                    .results(3)
                    .result_type(0, "authors")
                    .self_link(0, "/authors/2")
                    .result_type(1, "books")
                    .self_link(1, "/books/1")
                    .without_data(2)
                    .related("books", "1", "author", &[("authors", "2")])
                    .related("authors", "2", "books", &[("books", "1")])
            })
            .step("book_for_unknown_author", |a| {
                a.status(400)
                    .error("not available at this point")
                    .error_pointer("/atomic:operations[0]/data/relationships/author/data/lid")
                    .count("books", 1)
            })
            .step("book_with_client_id", |a| {
                a.status(403)
                    .error_pointer("/atomic:operations[0]/data/id")
                    .count("books", 1)
            })
            .step("book_without_title", |a| {
                a.status(422)
                    .error_detail("title")
                    .error_pointer("/atomic:operations[0]/data/attributes/title")
            })
            .step("book_with_unknown_type", |a| {
                a.status(422)
                    .error_detail("'magazines'")
                    .error_pointer("/atomic:operations[0]/data/type")
            })
            .step("mismatched_update", |a| {
                a.status(409)
                    .error_detail("does not match '1'")
                    .error_pointer("/atomic:operations[0]/data/id")
            })
            .step("malformed_operation", |a| a.status(422).error_detail("upsert"))
            .step("no_operations", |a| {
                a.status(400)
                    .error("No operations found")
                    .error_pointer("/atomic:operations")
            })
            .step("missing_body", |a| a.status(422).error("Missing request body"))
            .step("four_operations", |a| {
                a.status(413)
                    .error_detail("(4) is higher than the maximum of 3")
                    .count("books", 1)
            })
    }

    #[test]
    fn test_author_and_book_linked_by_local_id() {
        scenario().run().unwrap();
    }
}

mod households {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("households")
            .catalog(Catalog::Library)
            .seed("library/seeds/minimal.ops")
            .operations("library/operations/households.ops")
            .step("add_members_of_subtypes", |a| {
                a.no_content()
                    .related("households", "1", "members", &[("men", "1"), ("women", "1")])
                    .related("households", "1", "owner", &[("women", "1")])
            })
            .step("add_author_as_member", |a| {
                a.status(409)
                    .error_detail("'authors'")
                    .error_pointer("/atomic:operations[0]/data[0]/type")
            })
            .step("create_abstract_person", |a| {
                a.status(403)
                    .error("not accessible")
                    .error_pointer("/atomic:operations[0]/op")
            })
            .step("write_audit_entry", |a| {
                a.ok().results(1).result_type(0, "auditEntries").count("auditEntries", 1)
            })
            .step("delete_audit_entry", |a| {
                a.status(403)
                    .error_detail("delete-resource")
                    .error_pointer("/atomic:operations[1]/op")
                    .count("auditEntries", 1)
            })
    }

    #[test]
    fn test_subtypes_and_refused_operations() {
        scenario().run().unwrap();
    }
}
