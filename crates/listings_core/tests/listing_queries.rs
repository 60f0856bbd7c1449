use chrono::{DateTime, Duration, TimeZone, Utc};
use listings_core::db::open_db_in_memory;
use listings_core::{ArtistFields, Listings, ListingsError, NewShow, ValidationError, VenueFields};
use std::collections::HashSet;

fn at(year: i32, month: u32, day: u32, hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, min, 0).unwrap()
}

fn venue(listings: &Listings<'_>, name: &str, city: &str, state: &str) -> i64 {
    listings
        .venues
        .create_venue(VenueFields::new(name, city, state))
        .unwrap()
        .id
}

fn artist(listings: &Listings<'_>, name: &str) -> i64 {
    listings
        .artists
        .create_artist(ArtistFields::new(name, "San Francisco", "CA"))
        .unwrap()
        .id
}

fn book(
    listings: &Listings<'_>,
    venue_id: i64,
    artist_id: i64,
    start_time: DateTime<Utc>,
) -> i64 {
    listings
        .shows
        .book_show(NewShow {
            venue_id,
            artist_id,
            start_time,
        })
        .unwrap()
        .id
}

#[test]
fn venues_group_by_exact_city_and_state() {
    let conn = open_db_in_memory().unwrap();
    let listings = Listings::try_new(&conn).unwrap();

    let hop = venue(&listings, "The Musical Hop", "San Francisco", "CA");
    let pianos = venue(&listings, "The Dueling Pianos Bar", "New York", "NY");
    let park = venue(&listings, "Park Square Live Music & Coffee", "San Francisco", "CA");
    let lower = venue(&listings, "Corner Club", "san francisco", "CA");

    let areas = listings.venues.venues_by_area().unwrap();
    let summary: Vec<(&str, &str, Vec<i64>)> = areas
        .iter()
        .map(|area| {
            (
                area.city.as_str(),
                area.state.as_str(),
                area.venues.iter().map(|v| v.id).collect(),
            )
        })
        .collect();

    assert_eq!(
        summary,
        vec![
            ("New York", "NY", vec![pianos]),
            ("San Francisco", "CA", vec![hop, park]),
            ("san francisco", "CA", vec![lower]),
        ]
    );
}

#[test]
fn venue_search_is_case_insensitive_substring() {
    let conn = open_db_in_memory().unwrap();
    let listings = Listings::try_new(&conn).unwrap();
    let hop = venue(&listings, "The Musical Hop", "San Francisco", "CA");
    venue(&listings, "The Dueling Pianos Bar", "New York", "NY");
    let park = venue(&listings, "Park Square Live Music & Coffee", "San Francisco", "CA");

    for term in ["hop", "HOP", "l Hop"] {
        let results = listings.venues.search_venues(term).unwrap();
        assert_eq!(results.count, 1, "term {term:?}");
        assert_eq!(results.data[0].id, hop);
        assert_eq!(results.data[0].name, "The Musical Hop");
    }

    let music = listings.venues.search_venues("Music").unwrap();
    let ids: Vec<i64> = music.data.iter().map(|hit| hit.id).collect();
    assert_eq!(ids, vec![hop, park]);
    assert_eq!(music.count, 2);
}

#[test]
fn empty_search_matches_everything_and_wildcards_are_literal() {
    let conn = open_db_in_memory().unwrap();
    let listings = Listings::try_new(&conn).unwrap();
    artist(&listings, "Guns N Petals");
    let percent = artist(&listings, "100% Brass");

    assert_eq!(listings.artists.search_artists("").unwrap().count, 2);
    assert_eq!(listings.artists.search_artists(" ").unwrap().count, 2);
    assert_eq!(listings.artists.search_artists("  ").unwrap().count, 0);

    let literal = listings.artists.search_artists("%").unwrap();
    assert_eq!(literal.count, 1);
    assert_eq!(literal.data[0].id, percent);

    assert_eq!(listings.artists.search_artists("_").unwrap().count, 0);
    assert_eq!(listings.artists.search_artists("jazz").unwrap().count, 0);
}

#[test]
fn search_folds_non_ascii_letters() {
    let conn = open_db_in_memory().unwrap();
    let listings = Listings::try_new(&conn).unwrap();
    let emile = venue(&listings, "Café Émile", "Montréal", "QC");
    venue(&listings, "The Musical Hop", "San Francisco", "CA");
    let strasse = artist(&listings, "Straßenmusik Ümläut");

    for term in ["émile", "ÉMILE", "Émile", "CAFÉ"] {
        let results = listings.venues.search_venues(term).unwrap();
        assert_eq!(results.count, 1, "term {term:?}");
        assert_eq!(results.data[0].id, emile);
    }

    for term in ["ümläut", "ÜMLÄUT", "straß"] {
        let results = listings.artists.search_artists(term).unwrap();
        assert_eq!(results.count, 1, "term {term:?}");
        assert_eq!(results.data[0].id, strasse);
    }
}

#[test]
fn search_and_detail_agree_for_sub_millisecond_now() {
    let conn = open_db_in_memory().unwrap();
    let listings = Listings::try_new(&conn).unwrap();
    let hop = venue(&listings, "The Musical Hop", "San Francisco", "CA");
    let band = artist(&listings, "The Wild Sax Band");
    let start = at(2030, 1, 1, 0, 0);
    book(&listings, hop, band, start);

    for micros in [0, 500, 999] {
        let now = start + Duration::microseconds(micros);
        let hit = &listings.venues.search_venues_at("hop", now).unwrap().data[0];
        let detail = listings.venues.venue_detail_at(hop, now).unwrap();
        assert_eq!(hit.num_upcoming_shows as usize, detail.upcoming_shows_count);
        assert_eq!(detail.upcoming_shows_count, 1, "now {now}");
        assert_eq!(detail.past_shows_count, 0);

        let artist_hit = &listings.artists.search_artists_at("sax", now).unwrap().data[0];
        let artist_detail = listings.artists.artist_detail_at(band, now).unwrap();
        assert_eq!(
            artist_hit.num_upcoming_shows as usize,
            artist_detail.upcoming_shows_count
        );
    }

    let later = start + Duration::milliseconds(1) + Duration::microseconds(1);
    let hit = &listings.venues.search_venues_at("hop", later).unwrap().data[0];
    let detail = listings.venues.venue_detail_at(hop, later).unwrap();
    assert_eq!(hit.num_upcoming_shows, 0);
    assert_eq!(detail.past_shows_count, 1);
}

#[test]
fn booked_start_time_is_kept_to_the_millisecond() {
    let conn = open_db_in_memory().unwrap();
    let listings = Listings::try_new(&conn).unwrap();
    let hop = venue(&listings, "The Musical Hop", "San Francisco", "CA");
    let band = artist(&listings, "The Wild Sax Band");
    let requested = at(2030, 1, 1, 0, 0) + Duration::microseconds(1_500);

    let show = listings
        .shows
        .book_show(NewShow {
            venue_id: hop,
            artist_id: band,
            start_time: requested,
        })
        .unwrap();

    assert_eq!(show.start_time, at(2030, 1, 1, 0, 0) + Duration::milliseconds(1));
    assert_eq!(listings.shows.get_show(show.id).unwrap(), show);
}

#[test]
fn search_hits_count_only_upcoming_shows() {
    let conn = open_db_in_memory().unwrap();
    let listings = Listings::try_new(&conn).unwrap();
    let hop = venue(&listings, "The Musical Hop", "San Francisco", "CA");
    let band = artist(&listings, "The Wild Sax Band");
    let now = at(2030, 1, 1, 12, 0);

    book(&listings, hop, band, now - Duration::days(2));
    book(&listings, hop, band, now);
    book(&listings, hop, band, now + Duration::days(10));

    let venues = listings.venues.search_venues_at("hop", now).unwrap();
    assert_eq!(venues.data[0].num_upcoming_shows, 2);

    let artists = listings.artists.search_artists_at("sax", now).unwrap();
    assert_eq!(artists.data[0].num_upcoming_shows, 2);
}

#[test]
fn detail_views_partition_shows_exclusively() {
    let conn = open_db_in_memory().unwrap();
    let listings = Listings::try_new(&conn).unwrap();
    let hop = venue(&listings, "The Musical Hop", "San Francisco", "CA");
    let park = venue(&listings, "Park Square Live Music & Coffee", "San Francisco", "CA");
    let petals = artist(&listings, "Guns N Petals");
    let sax = artist(&listings, "The Wild Sax Band");
    let now = at(2030, 6, 15, 18, 0);

    let mut all_at_hop = HashSet::new();
    all_at_hop.insert(book(&listings, hop, petals, now - Duration::days(30)));
    all_at_hop.insert(book(&listings, hop, sax, now - Duration::minutes(1)));
    all_at_hop.insert(book(&listings, hop, sax, now));
    all_at_hop.insert(book(&listings, hop, petals, now + Duration::days(7)));
    book(&listings, park, petals, now + Duration::days(1));

    let detail = listings.venues.venue_detail_at(hop, now).unwrap();
    let past: HashSet<i64> = detail.past_shows.iter().map(|s| s.show_id).collect();
    let upcoming: HashSet<i64> = detail.upcoming_shows.iter().map(|s| s.show_id).collect();

    assert!(past.is_disjoint(&upcoming));
    assert_eq!(&past | &upcoming, all_at_hop);
    assert_eq!(detail.past_shows_count, 2);
    assert_eq!(detail.upcoming_shows_count, 2);
    assert!(detail.past_shows.iter().all(|s| s.start_time < now));
    assert!(detail.upcoming_shows.iter().all(|s| s.start_time >= now));
    assert!(detail
        .past_shows
        .windows(2)
        .all(|pair| pair[0].start_time <= pair[1].start_time));

    let artist_detail = listings.artists.artist_detail_at(petals, now).unwrap();
    assert_eq!(artist_detail.past_shows_count, 1);
    assert_eq!(artist_detail.upcoming_shows_count, 2);
    let upcoming_venues: Vec<i64> = artist_detail
        .upcoming_shows
        .iter()
        .map(|s| s.venue_id)
        .collect();
    assert_eq!(upcoming_venues, vec![park, hop]);
}

#[test]
fn failed_create_leaves_counts_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let listings = Listings::try_new(&conn).unwrap();
    venue(&listings, "The Musical Hop", "San Francisco", "CA");
    artist(&listings, "Guns N Petals");

    let err = listings
        .venues
        .create_venue(VenueFields::new("", "Austin", "TX"))
        .unwrap_err();
    assert_eq!(
        err,
        ListingsError::Validation(ValidationError::MissingField("name"))
    );
    let err = listings
        .artists
        .create_artist(ArtistFields::new("Matt Quevedo", "New York", ""))
        .unwrap_err();
    assert_eq!(
        err,
        ListingsError::Validation(ValidationError::MissingField("state"))
    );

    assert_eq!(listings.venues.count_venues().unwrap(), 1);
    assert_eq!(listings.artists.count_artists().unwrap(), 1);
}

#[test]
fn musical_hop_show_from_2019_is_past() {
    let conn = open_db_in_memory().unwrap();
    let listings = Listings::try_new(&conn).unwrap();
    let hop = venue(&listings, "The Musical Hop", "San Francisco", "CA");
    let petals = artist(&listings, "Guns N Petals");
    book(&listings, hop, petals, at(2019, 5, 21, 21, 30));

    let detail = listings.venues.venue_detail(hop).unwrap();
    assert_eq!(detail.past_shows_count, 1);
    assert_eq!(detail.upcoming_shows_count, 0);
    assert_eq!(detail.past_shows[0].artist_id, petals);
    assert_eq!(detail.past_shows[0].artist_name, "Guns N Petals");
}

#[test]
fn venue_detail_serializes_flat_record_with_show_lists() {
    let conn = open_db_in_memory().unwrap();
    let listings = Listings::try_new(&conn).unwrap();
    let mut fields = VenueFields::new("The Musical Hop", "San Francisco", "CA");
    fields.genres = vec!["Jazz".to_string()];
    let hop = listings.venues.create_venue(fields).unwrap().id;
    let petals = artist(&listings, "Guns N Petals");
    book(&listings, hop, petals, at(2019, 5, 21, 21, 30));

    let detail = listings
        .venues
        .venue_detail_at(hop, at(2024, 1, 1, 0, 0))
        .unwrap();
    let json = serde_json::to_value(&detail).unwrap();

    assert_eq!(json["id"], hop);
    assert_eq!(json["name"], "The Musical Hop");
    assert_eq!(json["genres"], serde_json::json!(["Jazz"]));
    assert_eq!(json["seeking_talent"], false);
    assert_eq!(json["past_shows_count"], 1);
    assert_eq!(json["upcoming_shows_count"], 0);
    assert_eq!(json["past_shows"][0]["artist_name"], "Guns N Petals");
    assert_eq!(json["past_shows"][0]["start_time"], "2019-05-21T21:30:00Z");
    assert_eq!(json["upcoming_shows"], serde_json::json!([]));
}
