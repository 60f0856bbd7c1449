use chrono::{DateTime, Duration, TimeZone, Utc};
use listings_core::db::open_db_in_memory;
use listings_core::{
    ArtistFields, ConstraintViolation, Listings, ListingsError, NewShow, RecordKind, VenueFields,
};
use rusqlite::Connection;

fn at(year: i32, month: u32, day: u32, hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, min, 0).unwrap()
}

fn seed(listings: &Listings<'_>) -> (i64, i64) {
    let venue = listings
        .venues
        .create_venue(VenueFields::new("The Musical Hop", "San Francisco", "CA"))
        .unwrap();
    let artist = listings
        .artists
        .create_artist(ArtistFields::new("Guns N Petals", "San Francisco", "CA"))
        .unwrap();
    (venue.id, artist.id)
}

fn shows_in_table(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM shows;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn book_show_persists_booking() {
    let conn = open_db_in_memory().unwrap();
    let listings = Listings::try_new(&conn).unwrap();
    let (venue_id, artist_id) = seed(&listings);

    let start_time = at(2035, 4, 1, 20, 0);
    let show = listings
        .shows
        .book_show(NewShow {
            venue_id,
            artist_id,
            start_time,
        })
        .unwrap();

    assert_eq!(show.venue_id, venue_id);
    assert_eq!(show.artist_id, artist_id);
    assert_eq!(show.start_time, start_time);
    assert_eq!(listings.shows.get_show(show.id).unwrap(), show);
}

#[test]
fn booking_unknown_artist_is_a_constraint_error() {
    let conn = open_db_in_memory().unwrap();
    let listings = Listings::try_new(&conn).unwrap();
    let (venue_id, _) = seed(&listings);

    let err = listings
        .shows
        .book_show(NewShow {
            venue_id,
            artist_id: 999,
            start_time: at(2035, 1, 1, 0, 0),
        })
        .unwrap_err();

    assert_eq!(
        err,
        ListingsError::Constraint(ConstraintViolation::UnknownArtist(999))
    );
    assert_eq!(shows_in_table(&conn), 0);
}

#[test]
fn deleting_venue_cascades_and_blocks_new_bookings() {
    let conn = open_db_in_memory().unwrap();
    let listings = Listings::try_new(&conn).unwrap();
    let (venue_id, artist_id) = seed(&listings);

    for day in 1..=3 {
        listings
            .shows
            .book_show(NewShow {
                venue_id,
                artist_id,
                start_time: at(2035, 6, day, 21, 0),
            })
            .unwrap();
    }
    assert_eq!(shows_in_table(&conn), 3);

    assert_eq!(listings.venues.delete_venue(venue_id).unwrap(), 3);
    assert_eq!(shows_in_table(&conn), 0);
    assert!(listings.shows.list_shows().unwrap().is_empty());

    let err = listings
        .shows
        .book_show(NewShow {
            venue_id,
            artist_id,
            start_time: at(2035, 7, 1, 21, 0),
        })
        .unwrap_err();
    assert_eq!(
        err,
        ListingsError::Constraint(ConstraintViolation::UnknownVenue(venue_id))
    );
    assert_eq!(shows_in_table(&conn), 0);
}

#[test]
fn deleting_artist_cascades_to_its_shows() {
    let conn = open_db_in_memory().unwrap();
    let listings = Listings::try_new(&conn).unwrap();
    let (venue_id, artist_id) = seed(&listings);
    let other = listings
        .artists
        .create_artist(ArtistFields::new("Matt Quevedo", "New York", "NY"))
        .unwrap();

    listings
        .shows
        .book_show(NewShow {
            venue_id,
            artist_id,
            start_time: at(2035, 1, 1, 20, 0),
        })
        .unwrap();
    let kept = listings
        .shows
        .book_show(NewShow {
            venue_id,
            artist_id: other.id,
            start_time: at(2035, 1, 2, 20, 0),
        })
        .unwrap();

    assert_eq!(listings.artists.delete_artist(artist_id).unwrap(), 1);

    let remaining = listings.shows.list_shows().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].show_id, kept.id);
}

#[test]
fn delete_show_removes_one_booking() {
    let conn = open_db_in_memory().unwrap();
    let listings = Listings::try_new(&conn).unwrap();
    let (venue_id, artist_id) = seed(&listings);
    let show = listings
        .shows
        .book_show(NewShow {
            venue_id,
            artist_id,
            start_time: at(2035, 1, 1, 20, 0),
        })
        .unwrap();

    listings.shows.delete_show(show.id).unwrap();
    assert_eq!(
        listings.shows.get_show(show.id).unwrap_err(),
        ListingsError::NotFound {
            kind: RecordKind::Show,
            id: show.id
        }
    );
    assert_eq!(
        listings.shows.delete_show(show.id).unwrap_err(),
        ListingsError::NotFound {
            kind: RecordKind::Show,
            id: show.id
        }
    );
    assert_eq!(listings.venues.count_venues().unwrap(), 1);
}

#[test]
fn list_shows_orders_by_artist_then_start_time() {
    let conn = open_db_in_memory().unwrap();
    let listings = Listings::try_new(&conn).unwrap();
    let (venue_id, first_artist) = seed(&listings);
    let second_artist = listings
        .artists
        .create_artist(ArtistFields::new("The Wild Sax Band", "San Francisco", "CA"))
        .unwrap()
        .id;

    let base = at(2035, 4, 1, 20, 0);
    let book = |artist_id: i64, offset_days: i64| {
        listings
            .shows
            .book_show(NewShow {
                venue_id,
                artist_id,
                start_time: base + Duration::days(offset_days),
            })
            .unwrap()
            .id
    };
    let late_second = book(second_artist, 5);
    let late_first = book(first_artist, 3);
    let early_second = book(second_artist, 1);
    let early_first = book(first_artist, 2);

    let listed = listings.shows.list_shows().unwrap();
    let ids: Vec<i64> = listed.iter().map(|show| show.show_id).collect();
    assert_eq!(ids, vec![early_first, late_first, early_second, late_second]);
    assert_eq!(listed[0].venue_name, "The Musical Hop");
    assert_eq!(listed[0].artist_name, "Guns N Petals");
}
