use sqlx::PgPool;

#[derive(Clone)]
pub struct SqlxFileRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxHeroImageRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxPodcastRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxEpisodeRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxVariableRepo {
    pub pool: PgPool,
}
