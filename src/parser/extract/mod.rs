pub mod callouts;
pub mod credits;
pub mod media;
pub mod testimonials;

use serde::Serialize;

use crate::model::WorkItem;
use credits::Credit;
use media::HeroMedia;
use testimonials::Testimonial;

/// Every derived view of one work item, as consumed by a render target.
#[derive(Debug, Clone, Serialize)]
pub struct WorkDetail {
    pub id: String,
    pub title: String,
    pub year: Option<String>,
    pub client: Option<String>,
    pub genres: Vec<String>,
    pub roles: Vec<String>,
    pub description: String,
    pub meta_description: Option<String>,
    pub challenge: String,
    pub result: String,
    pub hero: Option<HeroMedia>,
    pub cover_image: Option<String>,
    pub video_url: Option<String>,
    pub embed_url: Option<String>,
    pub blog_url: Option<String>,
    pub images: Vec<String>,
    pub gallery: Vec<String>,
    pub credits: Vec<Credit>,
    pub testimonials: Vec<Testimonial>,
}

pub fn extract_all(work: &WorkItem) -> WorkDetail {
    let blocks = &work.content;
    let props = &work.properties;

    let description = callouts::description(blocks);
    let video_url = media::video_url(work);
    let embed_url = video_url.as_deref().and_then(media::youtube_embed_url);

    WorkDetail {
        id: work.id.clone(),
        title: work.display_title().to_string(),
        year: props.year_of_release(),
        client: props.client(),
        genres: props.genre(),
        roles: props.roles(),
        meta_description: callouts::meta_description(&description),
        description,
        challenge: callouts::challenge(blocks),
        result: callouts::result(blocks),
        hero: media::hero_media(work),
        cover_image: media::cover_image(work),
        video_url,
        embed_url,
        blog_url: media::blog_url(work),
        images: media::images(blocks),
        gallery: media::gallery(work),
        credits: credits::extract(blocks),
        testimonials: testimonials::extract(blocks),
    }
}

// ── Tests ──
