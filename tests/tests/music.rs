//! Music catalog integration tests.
//!
//! These tests run atomic operation requests against the music catalog.

use jolt_tests::prelude::*;

mod languages {
    use super::*;

    fn options() -> AtomicOptions {
        AtomicOptions {
            namespace: Some("api".to_string()),
            ..AtomicOptions::default()
        }
    }

    pub fn scenario() -> Scenario {
        Scenario::new("languages")
            .catalog(Catalog::Music)
            .options(options())
            .operations("music/operations/languages.ops")
            .step("create_language_and_company", |a| {
                a.ok()
                    .results(2)
                    .result_type(0, "textLanguages")
                    .result_type(1, "recordCompanies")
                    .self_link(0, "/api/textLanguages/${language}")
                    .self_link(1, "/api/recordCompanies/1")
                    .attr(0, "isoCode", "nl")
                    .attr(1, "name", "Sony Music")
                    .count("textLanguages", 1)
                    .count("recordCompanies", 1)
            })
            .step("rename_company", |a| a.no_content())
            .step("remove_language", |a| {
                a.no_content().count("textLanguages", 0).count("recordCompanies", 1)
            })
            .step("remove_language_again", |a| {
                a.status(404)
                    .error("does not exist")
                    .error_pointer("/atomic:operations[0]")
            })
            .step("language_with_bad_iso_code", |a| {
                a.status(422)
                    .error_matches(r"between 2 and 3, got 5")
                    .error_pointer("/atomic:operations[0]/data/attributes/isoCode")
                    .count("textLanguages", 0)
            })
            .step("remove_language_with_malformed_id", |a| {
                a.status(422)
                    .error_detail("not-a-guid")
                    .error_pointer("/atomic:operations[0]/ref/id")
            })
    }

    #[test]
    fn test_resources_of_different_id_kinds_in_one_request() {
        scenario().run().unwrap();
    }
}

mod lyrics {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("lyrics")
            .catalog(Catalog::Music)
            .seed("music/seeds/catalog.ops")
            .operations("music/operations/lyrics.ops")
            .step("create_track_with_lyric", |a| {
                a.ok()
                    .results(3)
                    .result_type(0, "tracks")
                    .self_link(0, "/tracks/${track}")
                    // Defaults make the created track differ from the request
                    .attr(0, "genre", "unknown")
                    .attr(1, "format", "LRC")
                    .no_attr(1, "text")
                    .without_data(2)
                    .count("lyrics", 2)
                    .related("lyrics", "${lyric}", "track", &[("tracks", "${track}")])
                    .related("lyrics", "${lyric}", "language", &[("textLanguages", "${english}")])
                    .related("tracks", "${track}", "lyric", &[("lyrics", "${lyric}")])
            })
            .step("update_lyric_text", |a| a.no_content())
            .step("write_readonly_attribute", |a| {
                a.status(422)
                    .error_detail("createdAt")
                    .error_pointer("/atomic:operations[0]/data/attributes/createdAt")
            })
            .step("company_is_its_own_parent", |a| {
                a.status(400)
                    .error("cannot be both defined and used")
                    .error_pointer("/atomic:operations[1]/data/relationships/parent/data/lid")
                    .count("tracks", 2)
                    .count("recordCompanies", 2)
            })
            .step("reference_before_declaration", |a| {
                a.status(400)
                    .error_detail("Local ID 'later' of type 'tracks'")
                    .error_pointer("/atomic:operations[0]/data/relationships/track/data/lid")
                    .count("lyrics", 2)
                    .count("tracks", 2)
            })
            .step("same_lid_for_different_types", |a| {
                a.ok().results(2).count("lyrics", 3).count("tracks", 3)
            })
            .step("same_lid_twice", |a| {
                a.status(400)
                    .error_detail("already defined")
                    .error_pointer("/atomic:operations[1]/data/lid")
                    .count("tracks", 3)
            })
    }

    #[test]
    fn test_local_ids_across_types() {
        scenario().run().unwrap();
    }
}

mod track_relationships {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("track_relationships")
            .catalog(Catalog::Music)
            .seed("music/seeds/catalog.ops")
            .operations("music/operations/tracks.ops")
            .step("add_performers", |a| {
                a.no_content().related(
                    "tracks",
                    "${purple_rain}",
                    "performers",
                    &[("performers", "1"), ("performers", "2"), ("performers", "3")],
                )
            })
            .step("remove_performer", |a| {
                a.no_content().related(
                    "tracks",
                    "${purple_rain}",
                    "performers",
                    &[("performers", "2"), ("performers", "3")],
                )
            })
            .step("replace_owner_and_playlists", |a| {
                a.no_content()
                    .related("tracks", "${purple_rain}", "ownedBy", &[("recordCompanies", "2")])
                    .related("tracks", "${purple_rain}", "occursIn", &[("playlists", "1")])
            })
            .step("clear_owner", |a| {
                a.no_content()
                    .related("tracks", "${purple_rain}", "ownedBy", &[])
            })
            // The new performer and its link to the track are rolled back
            .step("add_then_fail", |a| {
                a.status(404)
                    .error_pointer("/atomic:operations[2]")
                    .count("performers", 3)
                    .related(
                        "tracks",
                        "${purple_rain}",
                        "performers",
                        &[("performers", "2"), ("performers", "3")],
                    )
            })
            .step("add_to_to_one", |a| {
                a.status(403)
                    .error("Only to-many relationships")
                    .error_pointer("/atomic:operations[0]/ref/relationship")
            })
            .step("wrong_identifier_type", |a| {
                a.status(409)
                    .error_detail("'playlists'")
                    .error_pointer("/atomic:operations[0]/data[0]/type")
            })
            .step("unknown_relationship", |a| {
                a.status(404)
                    .error_detail("composers")
                    .error_pointer("/atomic:operations[0]/ref/relationship")
            })
            .step("missing_related_performer", |a| {
                a.status(404)
                    .error_detail("with ID '99'")
                    .error_pointer("/atomic:operations[0]")
            })
            .step("client_id_at_third_position", |a| {
                a.status(403)
                    .error_detail("client-supplied ID")
                    .error_pointer("/atomic:operations[2]/data/id")
                    .count("performers", 3)
                    .count("playlists", 1)
            })
            .step("delete_track", |a| {
                a.no_content()
                    .count("tracks", 0)
                    .related("lyrics", "1", "track", &[])
            })
    }

    #[test]
    fn test_relationship_operations_and_rollback() {
        scenario().run().unwrap();
    }
}

mod performers {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("performers")
            .catalog(Catalog::Music)
            .seed("music/seeds/catalog.ops")
            .operations("music/operations/performers.ops")
            .step("rename_performer", |a| {
                a.ok()
                    .results(1)
                    .self_link(0, "/performers/2")
                    .attr(0, "artistName", "Madonna Ciccone")
            })
            .step("invalid_birth_date", |a| {
                a.status(422)
                    .error_pointer("/atomic:operations[0]/data/attributes/bornAt")
            })
            .step("update_with_mismatched_types", |a| {
                a.status(409)
                    .error_detail("'playlists'")
                    .error_pointer("/atomic:operations[0]/data/type")
            })
    }

    #[test]
    fn test_always_tracked_updates_are_reported() {
        scenario().run().unwrap();
    }
}
