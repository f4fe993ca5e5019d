//! ODM2 subset DDL
//!
//! Only the tables and columns the query layer touches. Table and column
//! names follow ODM2 (lower-cased, no schema prefix). Timestamps are ISO-8601
//! text in local time, with the UTC offset (hours) in a separate column.

/// Statements creating every table the DAO reads from
pub const ODM2_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS spatialreferences (
    spatialreferenceid INTEGER PRIMARY KEY,
    srscode TEXT,
    srsname TEXT NOT NULL,
    srsdescription TEXT
);

CREATE TABLE IF NOT EXISTS samplingfeatures (
    samplingfeatureid INTEGER PRIMARY KEY,
    samplingfeaturetypecv TEXT NOT NULL,
    samplingfeaturecode TEXT NOT NULL UNIQUE,
    samplingfeaturename TEXT,
    samplingfeaturedescription TEXT,
    elevation_m REAL
);

CREATE TABLE IF NOT EXISTS sites (
    samplingfeatureid INTEGER PRIMARY KEY REFERENCES samplingfeatures(samplingfeatureid),
    sitetypecv TEXT NOT NULL,
    latitude REAL NOT NULL,
    longitude REAL NOT NULL,
    spatialreferenceid INTEGER REFERENCES spatialreferences(spatialreferenceid)
);

CREATE TABLE IF NOT EXISTS specimens (
    samplingfeatureid INTEGER PRIMARY KEY REFERENCES samplingfeatures(samplingfeatureid),
    specimentypecv TEXT NOT NULL,
    specimenmediumcv TEXT NOT NULL,
    isfieldspecimen INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS relatedfeatures (
    relationid INTEGER PRIMARY KEY,
    samplingfeatureid INTEGER NOT NULL REFERENCES samplingfeatures(samplingfeatureid),
    relationshiptypecv TEXT NOT NULL,
    relatedfeatureid INTEGER NOT NULL REFERENCES samplingfeatures(samplingfeatureid)
);

CREATE TABLE IF NOT EXISTS organizations (
    organizationid INTEGER PRIMARY KEY,
    organizationtypecv TEXT NOT NULL,
    organizationcode TEXT NOT NULL,
    organizationname TEXT NOT NULL,
    organizationdescription TEXT,
    organizationlink TEXT
);

CREATE TABLE IF NOT EXISTS people (
    personid INTEGER PRIMARY KEY,
    personfirstname TEXT NOT NULL,
    personlastname TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS affiliations (
    affiliationid INTEGER PRIMARY KEY,
    personid INTEGER REFERENCES people(personid),
    organizationid INTEGER REFERENCES organizations(organizationid),
    primaryphone TEXT,
    primaryemail TEXT NOT NULL,
    primaryaddress TEXT
);

CREATE TABLE IF NOT EXISTS methods (
    methodid INTEGER PRIMARY KEY,
    methodtypecv TEXT NOT NULL,
    methodcode TEXT NOT NULL,
    methodname TEXT NOT NULL,
    methoddescription TEXT,
    methodlink TEXT,
    organizationid INTEGER REFERENCES organizations(organizationid)
);

CREATE TABLE IF NOT EXISTS actions (
    actionid INTEGER PRIMARY KEY,
    actiontypecv TEXT NOT NULL,
    methodid INTEGER REFERENCES methods(methodid),
    begindatetime TEXT NOT NULL,
    begindatetimeutcoffset INTEGER NOT NULL DEFAULT 0,
    enddatetime TEXT,
    enddatetimeutcoffset INTEGER
);

CREATE TABLE IF NOT EXISTS actionby (
    bridgeid INTEGER PRIMARY KEY,
    actionid INTEGER NOT NULL REFERENCES actions(actionid),
    affiliationid INTEGER NOT NULL REFERENCES affiliations(affiliationid),
    isactionlead INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS featureactions (
    featureactionid INTEGER PRIMARY KEY,
    samplingfeatureid INTEGER NOT NULL REFERENCES samplingfeatures(samplingfeatureid),
    actionid INTEGER REFERENCES actions(actionid)
);

CREATE TABLE IF NOT EXISTS units (
    unitsid INTEGER PRIMARY KEY,
    unitstypecv TEXT NOT NULL,
    unitsabbreviation TEXT NOT NULL,
    unitsname TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS variables (
    variableid INTEGER PRIMARY KEY,
    variabletypecv TEXT NOT NULL,
    variablecode TEXT NOT NULL,
    variablenamecv TEXT NOT NULL,
    variabledefinition TEXT,
    speciationcv TEXT,
    nodatavalue REAL NOT NULL
);

CREATE TABLE IF NOT EXISTS processinglevels (
    processinglevelid INTEGER PRIMARY KEY,
    processinglevelcode TEXT NOT NULL,
    definition TEXT,
    explanation TEXT
);

CREATE TABLE IF NOT EXISTS results (
    resultid INTEGER PRIMARY KEY,
    featureactionid INTEGER NOT NULL REFERENCES featureactions(featureactionid),
    resulttypecv TEXT NOT NULL,
    variableid INTEGER REFERENCES variables(variableid),
    unitsid INTEGER REFERENCES units(unitsid),
    processinglevelid INTEGER REFERENCES processinglevels(processinglevelid),
    sampledmediumcv TEXT NOT NULL,
    valuecount INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS measurementresults (
    resultid INTEGER PRIMARY KEY REFERENCES results(resultid),
    censorcodecv TEXT NOT NULL,
    qualitycodecv TEXT,
    aggregationstatisticcv TEXT,
    timeaggregationinterval REAL,
    timeaggregationintervalunitsid INTEGER REFERENCES units(unitsid)
);

CREATE TABLE IF NOT EXISTS measurementresultvalues (
    valueid INTEGER PRIMARY KEY,
    resultid INTEGER NOT NULL REFERENCES measurementresults(resultid),
    datavalue REAL NOT NULL,
    valuedatetime TEXT NOT NULL,
    valuedatetimeutcoffset INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_mrv_result_time
    ON measurementresultvalues(resultid, valuedatetime);
CREATE INDEX IF NOT EXISTS idx_results_featureaction
    ON results(featureactionid);
CREATE INDEX IF NOT EXISTS idx_featureactions_feature
    ON featureactions(samplingfeatureid);
";

/// Tables created by [`ODM2_SCHEMA`], in dependency order
pub const ODM2_TABLES: &[&str] = &[
    "spatialreferences",
    "samplingfeatures",
    "sites",
    "specimens",
    "relatedfeatures",
    "organizations",
    "people",
    "affiliations",
    "methods",
    "actions",
    "actionby",
    "featureactions",
    "units",
    "variables",
    "processinglevels",
    "results",
    "measurementresults",
    "measurementresultvalues",
];
