//! Internal category vocabulary <-> external provider taxonomy (spec §4.1,
//! §6). Grounded verbatim on
//! `original_source/plans/engineV3/providers_core.py`'s `CATEGORY_TO_GOOGLE`
//! table and `_guess_category` specificity ladder. Per spec.md §6 this
//! table is part of the external interface contract and must be preserved
//! bit-exact across deployments.

use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy)]
pub struct GoogleMapping {
    pub provider_type: &'static str,
    pub keyword: Option<&'static str>,
}

macro_rules! cat {
    ($m:expr, $name:expr, $gtype:expr) => {
        $m.insert($name, GoogleMapping { provider_type: $gtype, keyword: None })
    };
    ($m:expr, $name:expr, $gtype:expr, $kw:expr) => {
        $m.insert($name, GoogleMapping { provider_type: $gtype, keyword: Some($kw) })
    };
}

pub static CATEGORY_TO_GOOGLE: Lazy<HashMap<&'static str, GoogleMapping>> = Lazy::new(|| {
    let mut m = HashMap::new();
    // Food & drink
    cat!(m, "restaurant", "restaurant");
    cat!(m, "fine_dining", "fine_dining_restaurant");
    cat!(m, "fast_food", "fast_food_restaurant");
    cat!(m, "casual_dining", "restaurant", "casual");
    cat!(m, "mexican_restaurant", "mexican_restaurant");
    cat!(m, "italian_restaurant", "italian_restaurant");
    cat!(m, "chinese_restaurant", "chinese_restaurant");
    cat!(m, "japanese_restaurant", "japanese_restaurant");
    cat!(m, "indian_restaurant", "indian_restaurant");
    cat!(m, "french_restaurant", "french_restaurant");
    cat!(m, "thai_restaurant", "thai_restaurant");
    cat!(m, "spanish_restaurant", "spanish_restaurant");
    cat!(m, "greek_restaurant", "greek_restaurant");
    cat!(m, "korean_restaurant", "korean_restaurant");
    cat!(m, "vietnamese_restaurant", "vietnamese_restaurant");
    cat!(m, "middle_eastern_restaurant", "middle_eastern_restaurant");
    cat!(m, "lebanese_restaurant", "lebanese_restaurant");
    cat!(m, "turkish_restaurant", "turkish_restaurant");
    cat!(m, "brazilian_restaurant", "brazilian_restaurant");
    cat!(m, "indonesian_restaurant", "indonesian_restaurant");
    cat!(m, "mediterranean_restaurant", "mediterranean_restaurant");
    cat!(m, "african_restaurant", "african_restaurant");
    cat!(m, "asian_restaurant", "asian_restaurant");
    cat!(m, "barbecue_restaurant", "barbecue_restaurant");
    cat!(m, "seafood_restaurant", "seafood_restaurant");
    cat!(m, "steak_house", "steak_house");
    cat!(m, "sushi_restaurant", "sushi_restaurant");
    cat!(m, "ramen_restaurant", "ramen_restaurant");
    cat!(m, "pizza_restaurant", "pizza_restaurant");
    cat!(m, "hamburger_restaurant", "hamburger_restaurant");
    cat!(m, "sandwich_shop", "sandwich_shop");
    cat!(m, "breakfast_restaurant", "breakfast_restaurant");
    cat!(m, "brunch_restaurant", "brunch_restaurant");
    cat!(m, "vegan_restaurant", "vegan_restaurant");
    cat!(m, "vegetarian_restaurant", "vegetarian_restaurant");
    cat!(m, "buffet_restaurant", "buffet_restaurant");
    cat!(m, "dessert_restaurant", "dessert_restaurant");
    cat!(m, "diner", "diner");
    cat!(m, "food_court", "food_court");
    cat!(m, "cafeteria", "cafeteria");
    cat!(m, "local_restaurant", "restaurant", "local");
    cat!(m, "traditional_food", "restaurant", "traditional");
    cat!(m, "ethnic_restaurant", "restaurant", "ethnic");
    cat!(m, "romantic_restaurant", "restaurant", "romantic");
    cat!(m, "upscale_restaurant", "fine_dining_restaurant");
    cat!(m, "bar", "bar");
    cat!(m, "wine_bar", "wine_bar");
    cat!(m, "pub", "pub");
    cat!(m, "night_club", "night_club");
    cat!(m, "nightclub", "night_club");
    cat!(m, "dance_club", "night_club", "dance");
    cat!(m, "cocktail_bar", "bar", "cocktail");
    cat!(m, "hotel_bar", "bar", "hotel");
    cat!(m, "lounge", "bar", "lounge");
    cat!(m, "speakeasy", "bar", "speakeasy");
    cat!(m, "jazz_bar", "bar", "jazz");
    cat!(m, "karaoke", "karaoke");
    cat!(m, "comedy_club", "comedy_club");
    cat!(m, "cafe", "cafe");
    cat!(m, "coffee_shop", "coffee_shop");
    cat!(m, "tea_house", "tea_house");
    cat!(m, "bakery", "bakery");
    cat!(m, "ice_cream_shop", "ice_cream_shop");
    cat!(m, "dessert_shop", "dessert_shop");
    cat!(m, "donut_shop", "donut_shop");
    cat!(m, "bagel_shop", "bagel_shop");
    cat!(m, "chocolate_shop", "chocolate_shop");
    cat!(m, "candy_store", "candy_store");
    cat!(m, "juice_shop", "juice_shop");
    cat!(m, "specialty_coffee", "coffee_shop", "specialty");
    cat!(m, "roastery", "coffee_shop", "roastery");
    cat!(m, "third_wave_coffee", "coffee_shop", "third wave");
    cat!(m, "meal_takeaway", "meal_takeaway");
    cat!(m, "meal_delivery", "meal_delivery");
    cat!(m, "fast_food_restaurant", "fast_food_restaurant");
    cat!(m, "late_food", "meal_takeaway", "late night");
    cat!(m, "street_food", "meal_takeaway", "street food");
    cat!(m, "food_truck", "meal_takeaway", "food truck");
    // Entertainment & recreation
    cat!(m, "tourist_attraction", "tourist_attraction");
    cat!(m, "amusement_park", "amusement_park");
    cat!(m, "amusement_center", "amusement_center");
    cat!(m, "water_park", "water_park");
    cat!(m, "theme_park", "amusement_park", "theme");
    cat!(m, "aquarium", "aquarium");
    cat!(m, "zoo", "zoo");
    cat!(m, "wildlife_park", "wildlife_park");
    cat!(m, "wildlife_refuge", "wildlife_refuge");
    cat!(m, "landmark", "tourist_attraction", "landmark");
    cat!(m, "historical_landmark", "historical_landmark");
    cat!(m, "monument", "monument");
    cat!(m, "observation_deck", "observation_deck");
    cat!(m, "viewpoint", "observation_deck", "viewpoint");
    cat!(m, "scenic_spot", "observation_deck", "scenic");
    cat!(m, "photo_spot", "tourist_attraction", "photo");
    cat!(m, "historic_site", "historical_landmark");
    cat!(m, "historical_place", "historical_place");
    cat!(m, "cultural_landmark", "cultural_landmark");
    cat!(m, "castle", "historical_landmark", "castle");
    cat!(m, "sculpture", "sculpture");
    cat!(m, "park", "park");
    cat!(m, "national_park", "national_park");
    cat!(m, "state_park", "state_park");
    cat!(m, "dog_park", "dog_park");
    cat!(m, "botanical_garden", "botanical_garden");
    cat!(m, "garden", "garden");
    cat!(m, "plaza", "plaza");
    cat!(m, "picnic_ground", "picnic_ground");
    cat!(m, "barbecue_area", "barbecue_area");
    cat!(m, "hiking_area", "hiking_area");
    cat!(m, "trail", "hiking_area", "trail");
    cat!(m, "cycling_park", "cycling_park");
    cat!(m, "skateboard_park", "skateboard_park");
    cat!(m, "adventure_sports_center", "adventure_sports_center");
    cat!(m, "off_roading_area", "off_roading_area");
    cat!(m, "beach", "beach");
    cat!(m, "waterfront", "tourist_attraction", "waterfront");
    cat!(m, "marina", "marina");
    cat!(m, "movie_theater", "movie_theater");
    cat!(m, "cinema", "movie_theater");
    cat!(m, "bowling_alley", "bowling_alley");
    cat!(m, "casino", "casino");
    cat!(m, "event_venue", "event_venue");
    cat!(m, "convention_center", "convention_center");
    cat!(m, "wedding_venue", "wedding_venue");
    cat!(m, "banquet_hall", "banquet_hall");
    cat!(m, "video_arcade", "video_arcade");
    cat!(m, "internet_cafe", "internet_cafe");
    cat!(m, "ferris_wheel", "ferris_wheel");
    cat!(m, "roller_coaster", "roller_coaster");
    // Culture
    cat!(m, "museum", "museum");
    cat!(m, "art_gallery", "art_gallery");
    cat!(m, "art_studio", "art_studio");
    cat!(m, "performing_arts_theater", "performing_arts_theater");
    cat!(m, "theater", "performing_arts_theater");
    cat!(m, "opera_house", "opera_house");
    cat!(m, "concert_hall", "concert_hall");
    cat!(m, "philharmonic_hall", "philharmonic_hall");
    cat!(m, "auditorium", "auditorium");
    cat!(m, "amphitheatre", "amphitheatre");
    cat!(m, "planetarium", "planetarium");
    cat!(m, "cultural_center", "cultural_center");
    cat!(m, "community_center", "community_center");
    cat!(m, "visitor_center", "visitor_center");
    // Shopping
    cat!(m, "shopping_mall", "shopping_mall");
    cat!(m, "shopping_area", "store", "shopping street");
    cat!(m, "market", "market");
    cat!(m, "supermarket", "supermarket");
    cat!(m, "grocery_store", "grocery_store");
    cat!(m, "convenience_store", "convenience_store");
    cat!(m, "department_store", "department_store");
    cat!(m, "store", "store");
    cat!(m, "book_store", "book_store");
    cat!(m, "clothing_store", "clothing_store");
    cat!(m, "shoe_store", "shoe_store");
    cat!(m, "jewelry_store", "jewelry_store");
    cat!(m, "gift_shop", "gift_shop");
    cat!(m, "electronics_store", "electronics_store");
    cat!(m, "furniture_store", "furniture_store");
    cat!(m, "home_goods_store", "home_goods_store");
    cat!(m, "sporting_goods_store", "sporting_goods_store");
    cat!(m, "boutique", "clothing_store", "boutique");
    cat!(m, "vintage", "clothing_store", "vintage");
    cat!(m, "concept_store", "store", "concept");
    // Sports & fitness
    cat!(m, "gym", "gym");
    cat!(m, "fitness_center", "fitness_center");
    cat!(m, "yoga_studio", "yoga_studio");
    cat!(m, "sports_club", "sports_club");
    cat!(m, "sports_complex", "sports_complex");
    cat!(m, "stadium", "stadium");
    cat!(m, "arena", "arena");
    cat!(m, "golf_course", "golf_course");
    cat!(m, "swimming_pool", "swimming_pool");
    cat!(m, "ice_skating_rink", "ice_skating_rink");
    cat!(m, "ski_resort", "ski_resort");
    cat!(m, "playground", "playground");
    cat!(m, "athletic_field", "athletic_field");
    // Health & wellness
    cat!(m, "spa", "spa");
    cat!(m, "sauna", "sauna");
    cat!(m, "massage", "massage");
    cat!(m, "wellness_center", "wellness_center");
    cat!(m, "beauty_salon", "beauty_salon");
    cat!(m, "hair_salon", "hair_salon");
    cat!(m, "nail_salon", "nail_salon");
    cat!(m, "barber_shop", "barber_shop");
    // Lodging
    cat!(m, "hotel", "hotel");
    cat!(m, "lodging", "lodging");
    cat!(m, "resort_hotel", "resort_hotel");
    cat!(m, "motel", "motel");
    cat!(m, "hostel", "hostel");
    cat!(m, "bed_and_breakfast", "bed_and_breakfast");
    cat!(m, "guest_house", "guest_house");
    cat!(m, "campground", "campground");
    // Services
    cat!(m, "travel_agency", "travel_agency");
    cat!(m, "tour_agency", "tour_agency");
    cat!(m, "tourist_information_center", "tourist_information_center");
    // Worship
    cat!(m, "church", "church");
    cat!(m, "mosque", "mosque");
    cat!(m, "synagogue", "synagogue");
    cat!(m, "hindu_temple", "hindu_temple");
    // Transportation
    cat!(m, "airport", "airport");
    cat!(m, "train_station", "train_station");
    cat!(m, "bus_station", "bus_station");
    cat!(m, "subway_station", "subway_station");
    cat!(m, "transit_station", "transit_station");
    cat!(m, "parking", "parking");
    cat!(m, "gas_station", "gas_station");
    m
});

pub static GOOGLE_TYPES_TABLE_A: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "restaurant", "fine_dining_restaurant", "fast_food_restaurant",
        "mexican_restaurant", "italian_restaurant", "chinese_restaurant", "japanese_restaurant",
        "indian_restaurant", "french_restaurant", "thai_restaurant", "spanish_restaurant",
        "greek_restaurant", "korean_restaurant", "vietnamese_restaurant", "middle_eastern_restaurant",
        "lebanese_restaurant", "turkish_restaurant", "brazilian_restaurant", "indonesian_restaurant",
        "mediterranean_restaurant", "african_restaurant", "asian_restaurant", "american_restaurant",
        "barbecue_restaurant", "seafood_restaurant", "steak_house", "sushi_restaurant",
        "ramen_restaurant", "pizza_restaurant", "hamburger_restaurant", "sandwich_shop",
        "breakfast_restaurant", "brunch_restaurant", "vegan_restaurant", "vegetarian_restaurant",
        "buffet_restaurant", "dessert_restaurant", "diner", "food_court", "cafeteria",
        "bar", "wine_bar", "pub", "night_club", "karaoke", "comedy_club",
        "cafe", "coffee_shop", "tea_house", "bakery", "ice_cream_shop", "dessert_shop",
        "donut_shop", "bagel_shop", "chocolate_shop", "candy_store", "juice_shop",
        "meal_takeaway", "meal_delivery",
        "tourist_attraction", "amusement_park", "amusement_center", "water_park",
        "aquarium", "zoo", "wildlife_park", "wildlife_refuge",
        "historical_landmark", "monument", "observation_deck", "historical_place", "cultural_landmark", "sculpture",
        "park", "national_park", "state_park", "dog_park", "botanical_garden", "garden", "plaza",
        "picnic_ground", "barbecue_area", "hiking_area", "cycling_park", "skateboard_park",
        "adventure_sports_center", "off_roading_area", "beach", "marina",
        "movie_theater", "bowling_alley", "casino", "event_venue", "convention_center",
        "wedding_venue", "banquet_hall", "video_arcade", "internet_cafe",
        "ferris_wheel", "roller_coaster",
        "museum", "art_gallery", "art_studio", "performing_arts_theater", "opera_house",
        "concert_hall", "philharmonic_hall", "auditorium", "amphitheatre", "planetarium",
        "cultural_center", "community_center", "visitor_center",
        "shopping_mall", "market", "supermarket", "grocery_store", "convenience_store",
        "department_store", "store", "book_store", "clothing_store", "shoe_store",
        "jewelry_store", "gift_shop", "electronics_store", "furniture_store",
        "home_goods_store", "sporting_goods_store",
        "gym", "fitness_center", "yoga_studio", "sports_club", "sports_complex",
        "stadium", "arena", "golf_course", "swimming_pool", "ice_skating_rink",
        "ski_resort", "playground", "athletic_field",
        "spa", "sauna", "massage", "wellness_center", "beauty_salon", "hair_salon",
        "nail_salon", "barber_shop",
        "hotel", "lodging", "resort_hotel", "motel", "hostel", "bed_and_breakfast",
        "guest_house", "campground",
        "travel_agency", "tour_agency", "tourist_information_center",
        "church", "mosque", "synagogue", "hindu_temple",
        "airport", "train_station", "bus_station", "subway_station", "transit_station",
        "parking", "gas_station",
    ]
    .into_iter()
    .collect()
});

pub static GOOGLE_TYPES_TABLE_B: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "establishment", "point_of_interest", "food", "place_of_worship",
        "landmark", "natural_feature", "neighborhood", "political",
        "locality", "sublocality", "route", "street_address", "premise",
        "administrative_area_level_1", "administrative_area_level_2",
        "administrative_area_level_3", "administrative_area_level_4",
        "administrative_area_level_5", "country", "postal_code",
    ]
    .into_iter()
    .collect()
});

/// Reverse mapping: raw provider types -> internal category, following the
/// specificity ladder (exact desired-category match first, then a fixed
/// most-specific-wins order, then Table B generic types only if explicitly
/// requested). Returns `"other"` when nothing matches — callers must filter
/// the place out in that case (spec.md §4.1).
pub fn guess_category(provider_types: &[String], desired_categories: &[String]) -> String {
    let types: HashSet<&str> = provider_types.iter().map(|s| s.as_str()).collect();
    let table_a_matches: HashSet<&str> = types.intersection(&GOOGLE_TYPES_TABLE_A).copied().collect();

    if !table_a_matches.is_empty() {
        for desired in desired_categories {
            if let Some(mapping) = CATEGORY_TO_GOOGLE.get(desired.as_str()) {
                if table_a_matches.contains(mapping.provider_type) {
                    return desired.clone();
                }
            }
        }

        let has = |t: &str| table_a_matches.contains(t);
        if has("fine_dining_restaurant") {
            return "fine_dining".into();
        }
        if has("fast_food_restaurant") {
            return "fast_food".into();
        }
        for cuisine in [
            "mexican_restaurant", "italian_restaurant", "chinese_restaurant",
            "japanese_restaurant", "indian_restaurant", "french_restaurant",
            "thai_restaurant", "spanish_restaurant", "korean_restaurant",
            "vietnamese_restaurant", "seafood_restaurant", "steak_house",
            "sushi_restaurant", "pizza_restaurant",
        ] {
            if has(cuisine) {
                return cuisine.to_string();
            }
        }
        if has("restaurant") {
            return "restaurant".into();
        }
        if has("night_club") {
            return "nightclub".into();
        }
        if has("wine_bar") {
            return "wine_bar".into();
        }
        if has("pub") {
            return "pub".into();
        }
        if has("bar") {
            return "bar".into();
        }
        if has("coffee_shop") {
            return "coffee_shop".into();
        }
        if has("cafe") {
            return "cafe".into();
        }
        if has("tea_house") {
            return "tea_house".into();
        }
        if has("bakery") {
            return "bakery".into();
        }
        if has("ice_cream_shop") {
            return "ice_cream_shop".into();
        }
        if has("meal_takeaway") || has("meal_delivery") {
            return "meal_takeaway".into();
        }
        if has("monument") {
            return "monument".into();
        }
        if has("historical_landmark") {
            return "landmark".into();
        }
        if has("observation_deck") {
            return "viewpoint".into();
        }
        if has("historical_place") {
            return "historic_site".into();
        }
        if has("cultural_landmark") {
            return "landmark".into();
        }
        if has("museum") {
            return "museum".into();
        }
        if has("art_gallery") {
            return "art_gallery".into();
        }
        if has("performing_arts_theater") {
            return "theater".into();
        }
        if has("national_park") {
            return "national_park".into();
        }
        if has("dog_park") {
            return "dog_park".into();
        }
        if has("botanical_garden") {
            return "botanical_garden".into();
        }
        if has("park") {
            return "park".into();
        }
        if has("amusement_park") {
            return "amusement_park".into();
        }
        if has("water_park") {
            return "water_park".into();
        }
        if has("aquarium") {
            return "aquarium".into();
        }
        if has("zoo") {
            return "zoo".into();
        }
        if has("movie_theater") {
            return "cinema".into();
        }
        if has("casino") {
            return "casino".into();
        }
        if has("shopping_mall") {
            return "shopping_mall".into();
        }
        if has("market") {
            return "market".into();
        }
        if has("supermarket") {
            return "supermarket".into();
        }
        if has("store") {
            return "store".into();
        }
        if has("gym") || has("fitness_center") {
            return "gym".into();
        }
        if has("stadium") {
            return "stadium".into();
        }
        if has("hotel") || has("lodging") {
            return "hotel".into();
        }
        return table_a_matches.iter().next().unwrap().to_string();
    }

    if types.contains("tourist_attraction") || types.contains("point_of_interest") {
        if desired_categories.iter().any(|c| c == "tourist_attraction") {
            return "tourist_attraction".into();
        }
        if desired_categories.iter().any(|c| c == "landmark") {
            return "landmark".into();
        }
        if desired_categories.iter().any(|c| c == "viewpoint") {
            return "viewpoint".into();
        }
    }

    "other".into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn specific_cuisine_wins_over_generic_restaurant() {
        let types = vec!["fine_dining_restaurant".to_string(), "restaurant".to_string(), "food".to_string()];
        let cat = guess_category(&types, &["restaurant".to_string()]);
        assert_eq!(cat, "fine_dining");
    }

    #[test]
    fn nightclub_wins_over_bar() {
        let types = vec!["night_club".to_string(), "bar".to_string()];
        let cat = guess_category(&types, &[]);
        assert_eq!(cat, "nightclub");
    }

    #[test]
    fn generic_tourist_attraction_requires_explicit_request() {
        let types = vec!["tourist_attraction".to_string(), "point_of_interest".to_string()];
        assert_eq!(guess_category(&types, &[]), "other");
        assert_eq!(guess_category(&types, &["landmark".to_string()]), "landmark");
    }

    #[test]
    fn no_match_is_other() {
        let types = vec!["locality".to_string()];
        assert_eq!(guess_category(&types, &["restaurant".to_string()]), "other");
    }
}
